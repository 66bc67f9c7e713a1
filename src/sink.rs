//! 结果回调：逐个名称增量交付查询结果。
//!
//! Result delivery.
//!
//! The resolver does not build an aggregated result; it hands every outcome to
//! a [`LookupSink`] as soon as the outcome's batch has resolved. Calls come from
//! the task running the resolve operation, one at a time.

use crate::error::LookupError;
use crate::types::{LookupOutcome, ResolvedProfile};
use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::mpsc;

#[async_trait]
pub trait LookupSink: Send + Sync {
    async fn on_resolved(&self, profile: ResolvedProfile);

    /// `placeholder` carries the requested (normalized) name and no id.
    async fn on_failed(&self, placeholder: ResolvedProfile, error: LookupError);
}

/// Forwards outcomes into a bounded channel.
///
/// Sending waits for capacity, so a slow consumer slows the resolver down.
/// Outcomes are dropped once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<LookupOutcome>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<LookupOutcome>) -> Self {
        Self { tx }
    }

    /// Sink plus the receiving end of a fresh channel.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<LookupOutcome>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl LookupSink for ChannelSink {
    async fn on_resolved(&self, profile: ResolvedProfile) {
        let _ = self.tx.send(LookupOutcome::Resolved(profile)).await;
    }

    async fn on_failed(&self, placeholder: ResolvedProfile, error: LookupError) {
        let _ = self
            .tx
            .send(LookupOutcome::from_failure(placeholder, error))
            .await;
    }
}

/// Collects outcomes in memory.
#[derive(Debug, Default)]
pub struct InMemorySink {
    outcomes: Mutex<Vec<LookupOutcome>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> Vec<LookupOutcome> {
        self.outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn resolved(&self) -> Vec<ResolvedProfile> {
        self.outcomes()
            .into_iter()
            .filter_map(|o| match o {
                LookupOutcome::Resolved(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn not_found(&self) -> Vec<String> {
        self.outcomes()
            .into_iter()
            .filter_map(|o| match o {
                LookupOutcome::NotFound(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn failed(&self) -> Vec<String> {
        self.outcomes()
            .into_iter()
            .filter(LookupOutcome::is_failed)
            .map(|o| o.name())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.outcomes.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, outcome: LookupOutcome) {
        self.outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(outcome);
    }
}

#[async_trait]
impl LookupSink for InMemorySink {
    async fn on_resolved(&self, profile: ResolvedProfile) {
        self.push(LookupOutcome::Resolved(profile));
    }

    async fn on_failed(&self, placeholder: ResolvedProfile, error: LookupError) {
        self.push(LookupOutcome::from_failure(placeholder, error));
    }
}

/// Adapts a closure taking [`LookupOutcome`]s.
pub struct FnSink<F> {
    f: F,
}

impl<F> FnSink<F>
where
    F: Fn(LookupOutcome) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> LookupSink for FnSink<F>
where
    F: Fn(LookupOutcome) + Send + Sync,
{
    async fn on_resolved(&self, profile: ResolvedProfile) {
        (self.f)(LookupOutcome::Resolved(profile));
    }

    async fn on_failed(&self, placeholder: ResolvedProfile, error: LookupError) {
        (self.f)(LookupOutcome::from_failure(placeholder, error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn in_memory_sink_partitions_outcomes() {
        let sink = InMemorySink::new();
        sink.on_resolved(ResolvedProfile::new("1", "Alice")).await;
        sink.on_failed(
            ResolvedProfile::placeholder("bob"),
            LookupError::NotFound { name: "bob".into() },
        )
        .await;
        sink.on_failed(
            ResolvedProfile::placeholder("carol"),
            LookupError::Transport(Arc::new(TransportError::Other("down".into()))),
        )
        .await;

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.resolved()[0].name, "Alice");
        assert_eq!(sink.not_found(), vec!["bob".to_string()]);
        assert_eq!(sink.failed(), vec!["carol".to_string()]);
    }

    #[tokio::test]
    async fn channel_sink_forwards_and_tolerates_closed_receiver() {
        let (sink, mut rx) = ChannelSink::channel(4);
        sink.on_resolved(ResolvedProfile::new("1", "Alice")).await;
        assert!(rx.recv().await.unwrap().is_resolved());

        drop(rx);
        sink.on_resolved(ResolvedProfile::new("2", "Bob")).await;
    }

    #[tokio::test]
    async fn fn_sink_invokes_closure() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let sink = FnSink::new(move |_o: LookupOutcome| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        sink.on_resolved(ResolvedProfile::new("1", "Alice")).await;
        sink.on_failed(
            ResolvedProfile::placeholder("bob"),
            LookupError::NotFound { name: "bob".into() },
        )
        .await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
