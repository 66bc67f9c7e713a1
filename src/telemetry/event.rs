//! Core observer types.
//!
//! The resolver reports what it does as [`LookupEvent`]s to an injected
//! [`LookupObserver`] instead of logging through a process-wide logger.

use crate::types::ResolvedProfile;
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Something the resolver did. Serializable so observers can ship it as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LookupEvent {
    ResolveStarted {
        request_id: String,
        names: usize,
        batches: usize,
    },
    BatchStarted {
        request_id: String,
        batch_index: usize,
        attempt: u32,
        names: Vec<String>,
    },
    BatchReturned {
        request_id: String,
        batch_index: usize,
        profiles: usize,
    },
    ProfileResolved {
        request_id: String,
        batch_index: usize,
        profile: ResolvedProfile,
    },
    ProfileNotFound {
        request_id: String,
        batch_index: usize,
        name: String,
    },
    /// The name's batch was exhausted; the name gets a failed outcome.
    ProfileFailed {
        request_id: String,
        batch_index: usize,
        name: String,
        error: String,
    },
    /// A returned profile matched no outstanding requested name and was dropped.
    UnexpectedProfile {
        request_id: String,
        batch_index: usize,
        profile: ResolvedProfile,
    },
    RetryScheduled {
        request_id: String,
        batch_index: usize,
        fail_count: u32,
        delay_ms: u64,
        error: String,
    },
    BatchExhausted {
        request_id: String,
        batch_index: usize,
        attempts: u32,
        error: String,
    },
    ResolveCancelled {
        request_id: String,
        batches_completed: usize,
    },
    ResolveFinished {
        request_id: String,
        resolved: usize,
        not_found: usize,
        failed: usize,
        retries: u32,
        elapsed_ms: u64,
    },
}

impl LookupEvent {
    pub fn request_id(&self) -> &str {
        match self {
            LookupEvent::ResolveStarted { request_id, .. }
            | LookupEvent::BatchStarted { request_id, .. }
            | LookupEvent::BatchReturned { request_id, .. }
            | LookupEvent::ProfileResolved { request_id, .. }
            | LookupEvent::ProfileNotFound { request_id, .. }
            | LookupEvent::ProfileFailed { request_id, .. }
            | LookupEvent::UnexpectedProfile { request_id, .. }
            | LookupEvent::RetryScheduled { request_id, .. }
            | LookupEvent::BatchExhausted { request_id, .. }
            | LookupEvent::ResolveCancelled { request_id, .. }
            | LookupEvent::ResolveFinished { request_id, .. } => request_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LookupEvent::ResolveStarted { .. } => "resolve_started",
            LookupEvent::BatchStarted { .. } => "batch_started",
            LookupEvent::BatchReturned { .. } => "batch_returned",
            LookupEvent::ProfileResolved { .. } => "profile_resolved",
            LookupEvent::ProfileNotFound { .. } => "profile_not_found",
            LookupEvent::ProfileFailed { .. } => "profile_failed",
            LookupEvent::UnexpectedProfile { .. } => "unexpected_profile",
            LookupEvent::RetryScheduled { .. } => "retry_scheduled",
            LookupEvent::BatchExhausted { .. } => "batch_exhausted",
            LookupEvent::ResolveCancelled { .. } => "resolve_cancelled",
            LookupEvent::ResolveFinished { .. } => "resolve_finished",
        }
    }
}

/// Destination for resolver events.
///
/// Errors returned from `report` are ignored by the resolver.
#[async_trait]
pub trait LookupObserver: Send + Sync {
    async fn report(&self, event: LookupEvent) -> Result<()>;
}

/// Observer that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

#[async_trait]
impl LookupObserver for NoopObserver {
    async fn report(&self, _event: LookupEvent) -> Result<()> {
        Ok(())
    }
}

pub fn noop_observer() -> Arc<dyn LookupObserver> {
    Arc::new(NoopObserver)
}
