//! 遥测模块：解析过程事件的观察者实现。
//!
//! # Telemetry Module
//!
//! Observers receive structured [`LookupEvent`]s from the resolver.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`LookupObserver`] | Trait for event destinations |
//! | [`NoopObserver`] | Drops every event |
//! | [`TracingObserver`] | Forwards events to `tracing` (resolver default) |
//! | [`InMemoryObserver`] | Records events for tests |
//! | [`CompositeObserver`] | Fans out to several observers |

mod event;

pub use event::{noop_observer, LookupEvent, LookupObserver, NoopObserver};

use crate::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Logs events through `tracing`. Per-profile chatter is at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

#[async_trait]
impl LookupObserver for TracingObserver {
    async fn report(&self, event: LookupEvent) -> Result<()> {
        match &event {
            LookupEvent::ResolveStarted {
                request_id,
                names,
                batches,
            } => debug!(request_id = request_id.as_str(), names, batches, "profile lookup started"),
            LookupEvent::BatchStarted {
                request_id,
                batch_index,
                attempt,
                names,
            } => debug!(
                request_id = request_id.as_str(),
                batch_index,
                attempt,
                names = ?names,
                "searching profiles"
            ),
            LookupEvent::BatchReturned {
                request_id,
                batch_index,
                profiles,
            } => debug!(
                request_id = request_id.as_str(),
                batch_index,
                profiles,
                "page returned results, parsing"
            ),
            LookupEvent::ProfileResolved {
                request_id,
                profile,
                ..
            } => debug!(request_id = request_id.as_str(), %profile, "looked up profile"),
            LookupEvent::ProfileNotFound {
                request_id, name, ..
            } => debug!(request_id = request_id.as_str(), name = name.as_str(), "couldn't find profile"),
            LookupEvent::ProfileFailed {
                request_id,
                name,
                error,
                ..
            } => warn!(
                request_id = request_id.as_str(),
                name = name.as_str(),
                error = error.as_str(),
                "couldn't find profile because of a server error"
            ),
            LookupEvent::UnexpectedProfile {
                request_id,
                batch_index,
                profile,
            } => warn!(
                request_id = request_id.as_str(),
                batch_index,
                %profile,
                "server returned a profile that was not requested"
            ),
            LookupEvent::RetryScheduled {
                request_id,
                batch_index,
                fail_count,
                delay_ms,
                error,
            } => debug!(
                request_id = request_id.as_str(),
                batch_index,
                fail_count,
                delay_ms,
                error = error.as_str(),
                "profile search failed, retrying"
            ),
            LookupEvent::BatchExhausted {
                request_id,
                batch_index,
                attempts,
                error,
            } => warn!(
                request_id = request_id.as_str(),
                batch_index,
                attempts,
                error = error.as_str(),
                "couldn't look up batch because of a server error"
            ),
            LookupEvent::ResolveCancelled {
                request_id,
                batches_completed,
            } => info!(
                request_id = request_id.as_str(),
                batches_completed,
                "profile lookup cancelled"
            ),
            LookupEvent::ResolveFinished {
                request_id,
                resolved,
                not_found,
                failed,
                retries,
                elapsed_ms,
            } => debug!(
                request_id = request_id.as_str(),
                resolved,
                not_found,
                failed,
                retries,
                elapsed_ms,
                "profile lookup finished"
            ),
        }
        Ok(())
    }
}

/// Records every event in order. Used by tests to assert on resolver behavior.
#[derive(Debug, Default)]
pub struct InMemoryObserver {
    events: Mutex<Vec<LookupEvent>>,
}

impl InMemoryObserver {
    pub fn events(&self) -> Vec<LookupEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of recorded events of `kind` (see [`LookupEvent::kind`]).
    pub fn count(&self, kind: &str) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|e| e.kind() == kind)
            .count()
    }
}

#[async_trait]
impl LookupObserver for InMemoryObserver {
    async fn report(&self, event: LookupEvent) -> Result<()> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
        Ok(())
    }
}

/// Forwards each event to every inner observer, in order.
pub struct CompositeObserver(Vec<Arc<dyn LookupObserver>>);

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn LookupObserver>>) -> Self {
        Self(observers)
    }
}

#[async_trait]
impl LookupObserver for CompositeObserver {
    async fn report(&self, event: LookupEvent) -> Result<()> {
        for observer in &self.0 {
            let _ = observer.report(event.clone()).await;
        }
        Ok(())
    }
}
