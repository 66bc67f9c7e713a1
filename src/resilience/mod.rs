//! 弹性模块：批次重试策略与可取消的等待。
//!
//! # Resilience Primitives Module
//!
//! Building blocks the resolver uses to stay polite towards the remote
//! service while tolerating transient failures.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`RetryPolicy`] | Bounded, fixed-delay retry decision for one batch |
//! | [`Decision`] | What to do after a failed attempt |
//! | [`wait`] | Sleep that gives way to a cancellation token |
//!
//! ```rust
//! use profile_lookup::resilience::{Decision, RetryPolicy};
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::new(3, Duration::from_millis(750));
//! assert_eq!(policy.decide(1), Decision::Retry { delay: Duration::from_millis(750) });
//! assert_eq!(policy.decide(3), Decision::Exhausted);
//! ```

mod retry;
mod wait;

pub use retry::{Decision, RetryPolicy};
pub use wait::{wait, WaitOutcome};
