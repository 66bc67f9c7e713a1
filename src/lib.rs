//! # profile-lookup
//!
//! 批量、容错的玩家档案查询：把玩家名称解析为规范档案（唯一标识 + 规范名称）。
//!
//! Batched, fault-tolerant player profile lookup against a remote profile
//! search endpoint that accepts only a few names per request.
//!
//! ## Overview
//!
//! Give [`BatchProfileResolver`] a collection of names and a [`LookupSink`];
//! it normalizes and deduplicates the names, sends them to the remote service
//! in small batches one after another, retries transient failures a bounded
//! number of times, and reports exactly one outcome per distinct name:
//!
//! - **Resolved**: the service returned a matching profile;
//! - **NotFound**: the service answered but omitted the name;
//! - **Failed**: the name's batch failed on every attempt.
//!
//! Outcomes are delivered as soon as their batch resolves, not at the end.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use profile_lookup::{BatchProfileResolver, InMemorySink, LookupSettings};
//!
//! #[tokio::main]
//! async fn main() -> profile_lookup::Result<()> {
//!     let resolver = BatchProfileResolver::from_settings(&LookupSettings::default())?;
//!     let sink = InMemorySink::new();
//!
//!     let stats = resolver.resolve(["Notch", "jeb_", "notch", ""], &sink).await;
//!     println!("{} resolved, {} missing", stats.resolved, stats.not_found);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`batch`] | Name normalization and fixed-size batching |
//! | [`resolver`] | Batch driver, reconciliation, streaming API |
//! | [`resilience`] | Retry policy and cancellable waits |
//! | [`transport`] | Remote search trait and its HTTP implementation |
//! | [`sink`] | Per-name result delivery |
//! | [`telemetry`] | Observers for resolver events |
//! | [`config`] | Resolver and endpoint configuration |
//! | [`types`] | Profiles and outcomes |

pub mod batch;
pub mod config;
pub mod resilience;
pub mod resolver;
pub mod sink;
pub mod telemetry;
pub mod transport;
pub mod types;

pub use config::{EndpointConfig, LookupSettings, ResolverConfig};
pub use resolver::{
    BatchProfileResolver, BatchProfileResolverBuilder, CancelHandle, OutcomeStream, ResolveHandle,
    ResolveStats,
};
pub use sink::{ChannelSink, FnSink, InMemorySink, LookupSink};
pub use telemetry::{LookupEvent, LookupObserver};
pub use transport::{HttpProfileTransport, ProfileTransport, TransportError};
pub use types::{LookupOutcome, ResolvedProfile};

/// Re-exported so callers can cancel without depending on `tokio-util` directly.
pub use tokio_util::sync::CancellationToken;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
pub mod error;
pub use error::{Error, LookupError};
