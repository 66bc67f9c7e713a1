//! 批量档案解析器：分批、重试、对账并增量回调。
//!
//! # Batch Profile Resolver
//!
//! [`BatchProfileResolver`] turns a collection of player names into one
//! outcome per distinct name:
//!
//! 1. names are trimmed, lowercased and deduplicated;
//! 2. they are split into batches of `batch_size`;
//! 3. batches go to the transport strictly one after another, each retried up
//!    to `max_attempts` times with `retry_delay` in between;
//! 4. each answered batch is reconciled against the names it asked for and
//!    its outcomes are handed to the sink before the next batch starts;
//! 5. `inter_batch_delay` separates a successful batch from the next one.
//!
//! Cancelling the token stops the operation at the next suspension point
//! (transport call or delay). Outcomes already emitted stand; names not yet
//! processed get no outcome at all. A batch whose outcomes have started
//! emitting always finishes emitting.

mod driver;
mod reconcile;
mod stats;
mod stream;

pub use reconcile::{reconcile, Reconciliation};
pub use stats::ResolveStats;
pub use stream::{CancelHandle, OutcomeStream, ResolveHandle};

use crate::batch::{LookupRequest, NormalizedNames};
use crate::config::{EndpointConfig, LookupSettings, ResolverConfig};
use crate::error::LookupError;
use crate::resilience::{wait, WaitOutcome};
use crate::sink::LookupSink;
use crate::telemetry::{LookupEvent, LookupObserver, TracingObserver};
use crate::transport::{HttpProfileTransport, ProfileTransport, TransportError};
use crate::types::ResolvedProfile;
use crate::{Error, Result};
use driver::{BatchResolution, DriveContext};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Resolves player names to profiles through a [`ProfileTransport`].
///
/// Cheap to clone; clones share the transport and observer. Holds no state
/// between calls, so concurrent resolves on one instance are independent.
#[derive(Clone)]
pub struct BatchProfileResolver {
    config: ResolverConfig,
    transport: Arc<dyn ProfileTransport>,
    observer: Arc<dyn LookupObserver>,
}

impl std::fmt::Debug for BatchProfileResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchProfileResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BatchProfileResolver {
    /// Resolver with the given transport and configuration, logging through `tracing`.
    pub fn new(transport: Arc<dyn ProfileTransport>, config: ResolverConfig) -> Result<Self> {
        Self::builder().transport(transport).config(config).build()
    }

    pub fn builder() -> BatchProfileResolverBuilder {
        BatchProfileResolverBuilder::new()
    }

    /// Resolver backed by [`HttpProfileTransport`], configured from `settings`.
    pub fn from_settings(settings: &LookupSettings) -> Result<Self> {
        Self::builder()
            .config(settings.resolver.clone())
            .http_transport(&settings.endpoint)?
            .build()
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `names`, delivering outcomes to `sink`. Runs to completion.
    pub async fn resolve<I, S>(&self, names: I, sink: &dyn LookupSink) -> ResolveStats
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.resolve_with_cancel(names, sink, &CancellationToken::new())
            .await
    }

    /// Resolve `names`, stopping early once `cancel` fires.
    pub async fn resolve_with_cancel<I, S>(
        &self,
        names: I,
        sink: &dyn LookupSink,
        cancel: &CancellationToken,
    ) -> ResolveStats
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = NormalizedNames::from_raw(names);
        self.run(names, sink, cancel).await
    }

    async fn run(
        &self,
        names: NormalizedNames,
        sink: &dyn LookupSink,
        cancel: &CancellationToken,
    ) -> ResolveStats {
        let start = tokio::time::Instant::now();
        let request_id = Uuid::new_v4().to_string();
        let batch_size = self.config.batch_size;
        let mut stats = ResolveStats::new(
            request_id.clone(),
            names.len(),
            names.batch_count(batch_size),
        );

        self.report(LookupEvent::ResolveStarted {
            request_id: request_id.clone(),
            names: stats.names,
            batches: stats.batches_total,
        })
        .await;

        let ctx = DriveContext {
            request_id: &request_id,
            transport: self.transport.as_ref(),
            policy: self.config.retry_policy(),
            observer: self.observer.as_ref(),
            cancel,
        };

        let mut batches = names.batches(batch_size).peekable();
        while let Some(request) = batches.next() {
            if cancel.is_cancelled() {
                stats.cancelled = true;
                break;
            }
            stats.batches_issued += 1;

            match ctx.drive_batch(&request).await {
                BatchResolution::Resolved { profiles, retries } => {
                    stats.retries += retries;
                    if cancel.is_cancelled() {
                        stats.cancelled = true;
                        break;
                    }
                    self.emit_resolved(&request_id, &request, profiles, sink, &mut stats)
                        .await;
                    stats.batches_completed += 1;

                    if batches.peek().is_some()
                        && wait(self.config.inter_batch_delay, cancel).await
                            == WaitOutcome::Cancelled
                    {
                        stats.cancelled = true;
                        break;
                    }
                }
                BatchResolution::Exhausted { error, attempts } => {
                    stats.retries += attempts.saturating_sub(1);
                    if cancel.is_cancelled() {
                        stats.cancelled = true;
                        break;
                    }
                    self.emit_exhausted(&request_id, &request, error, sink, &mut stats)
                        .await;
                    stats.batches_completed += 1;
                    stats.batches_exhausted += 1;
                }
                BatchResolution::Cancelled { retries } => {
                    stats.retries += retries;
                    stats.cancelled = true;
                    break;
                }
            }
        }

        stats.elapsed = start.elapsed();
        if stats.cancelled {
            self.report(LookupEvent::ResolveCancelled {
                request_id,
                batches_completed: stats.batches_completed,
            })
            .await;
        } else {
            self.report(LookupEvent::ResolveFinished {
                request_id,
                resolved: stats.resolved,
                not_found: stats.not_found,
                failed: stats.failed,
                retries: stats.retries,
                elapsed_ms: stats.elapsed.as_millis() as u64,
            })
            .await;
        }
        stats
    }

    async fn emit_resolved(
        &self,
        request_id: &str,
        request: &LookupRequest,
        profiles: Vec<ResolvedProfile>,
        sink: &dyn LookupSink,
        stats: &mut ResolveStats,
    ) {
        let rec = reconcile(request, profiles);

        for profile in rec.unexpected {
            self.report(LookupEvent::UnexpectedProfile {
                request_id: request_id.to_string(),
                batch_index: request.index(),
                profile,
            })
            .await;
        }

        for profile in rec.resolved {
            self.report(LookupEvent::ProfileResolved {
                request_id: request_id.to_string(),
                batch_index: request.index(),
                profile: profile.clone(),
            })
            .await;
            sink.on_resolved(profile).await;
            stats.resolved += 1;
        }

        for name in rec.missing {
            self.report(LookupEvent::ProfileNotFound {
                request_id: request_id.to_string(),
                batch_index: request.index(),
                name: name.clone(),
            })
            .await;
            sink.on_failed(
                ResolvedProfile::placeholder(name.clone()),
                LookupError::NotFound { name },
            )
            .await;
            stats.not_found += 1;
        }
    }

    async fn emit_exhausted(
        &self,
        request_id: &str,
        request: &LookupRequest,
        error: Arc<TransportError>,
        sink: &dyn LookupSink,
        stats: &mut ResolveStats,
    ) {
        let cause = error.to_string();
        for name in request.names() {
            self.report(LookupEvent::ProfileFailed {
                request_id: request_id.to_string(),
                batch_index: request.index(),
                name: name.clone(),
                error: cause.clone(),
            })
            .await;
            sink.on_failed(
                ResolvedProfile::placeholder(name.clone()),
                LookupError::Transport(error.clone()),
            )
            .await;
            stats.failed += 1;
        }
    }

    async fn report(&self, event: LookupEvent) {
        let _ = self.observer.report(event).await;
    }
}

/// Builder for [`BatchProfileResolver`]. `build` validates the configuration.
pub struct BatchProfileResolverBuilder {
    config: ResolverConfig,
    transport: Option<Arc<dyn ProfileTransport>>,
    observer: Arc<dyn LookupObserver>,
}

impl BatchProfileResolverBuilder {
    pub fn new() -> Self {
        Self {
            config: ResolverConfig::default(),
            transport: None,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn batch_size(mut self, n: usize) -> Self {
        self.config.batch_size = n;
        self
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.config.max_attempts = n;
        self
    }

    pub fn retry_delay(mut self, d: std::time::Duration) -> Self {
        self.config.retry_delay = d;
        self
    }

    pub fn inter_batch_delay(mut self, d: std::time::Duration) -> Self {
        self.config.inter_batch_delay = d;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn ProfileTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use an [`HttpProfileTransport`] for `endpoint`. Fails on an invalid endpoint.
    pub fn http_transport(mut self, endpoint: &EndpointConfig) -> Result<Self> {
        self.transport = Some(Arc::new(HttpProfileTransport::new(endpoint)?));
        Ok(self)
    }

    /// Inject an observer. Default forwards events to `tracing`.
    pub fn observer(mut self, observer: Arc<dyn LookupObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn build(self) -> Result<BatchProfileResolver> {
        self.config.validate()?;
        let transport = self
            .transport
            .ok_or_else(|| Error::config("transport", "is required"))?;
        Ok(BatchProfileResolver {
            config: self.config,
            transport,
            observer: self.observer,
        })
    }
}

impl Default for BatchProfileResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
