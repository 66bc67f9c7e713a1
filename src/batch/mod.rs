//! 批处理模块：名称规范化与固定大小分批。
//!
//! # Name Batching Module
//!
//! Turns the raw names a caller hands to the resolver into the sequence of
//! bounded requests the remote search endpoint accepts.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`NormalizedNames`] | Trimmed, lowercased, deduplicated names in first-seen order |
//! | [`LookupRequest`] | One immutable batch of normalized names |
//! | [`Batches`] | Lazy iterator producing one [`LookupRequest`] at a time |
//!
//! ## Example
//!
//! ```rust
//! use profile_lookup::batch::NormalizedNames;
//!
//! let names = NormalizedNames::from_raw(["Alice", "alice", "", " ", "Bob", "carol"]);
//! assert_eq!(names.len(), 3);
//!
//! let sizes: Vec<usize> = names.batches(2).map(|b| b.len()).collect();
//! assert_eq!(sizes, vec![2, 1]);
//! ```

mod partition;
mod request;

pub use partition::Batches;
pub use request::{normalize_name, LookupRequest, NormalizedNames};
