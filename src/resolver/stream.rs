//! Streaming delivery: run a resolve on its own task and read outcomes as a `Stream`.

use super::{BatchProfileResolver, ResolveStats};
use crate::batch::NormalizedNames;
use crate::sink::ChannelSink;
use crate::types::LookupOutcome;
use crate::Result;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

const OUTCOME_CHANNEL_CAPACITY: usize = 64;

/// Cancels a running resolve operation.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

/// Outcomes of a spawned resolve, in emission order.
///
/// Ends when the operation completes or is cancelled. Dropping the stream
/// cancels the operation.
pub struct OutcomeStream {
    rx: mpsc::Receiver<LookupOutcome>,
    _guard: DropGuard,
}

impl Stream for OutcomeStream {
    type Item = LookupOutcome;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Control side of a spawned resolve.
pub struct ResolveHandle {
    cancel: CancelHandle,
    task: JoinHandle<ResolveStats>,
}

impl ResolveHandle {
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the operation to end and return its statistics.
    pub async fn finish(self) -> Result<ResolveStats> {
        Ok(self.task.await?)
    }
}

impl BatchProfileResolver {
    /// Spawn a resolve of `names` on the current tokio runtime.
    ///
    /// Outcomes arrive on the returned stream as each batch resolves; the
    /// channel is bounded, so an idle consumer pauses the resolver.
    pub fn resolve_stream<I, S>(&self, names: I) -> (OutcomeStream, ResolveHandle)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = NormalizedNames::from_raw(names);
        let (sink, rx) = ChannelSink::channel(OUTCOME_CHANNEL_CAPACITY);
        let token = CancellationToken::new();

        let resolver = self.clone();
        let task_token = token.clone();
        let task = tokio::spawn(async move { resolver.run(names, &sink, &task_token).await });

        let stream = OutcomeStream {
            rx,
            _guard: token.clone().drop_guard(),
        };
        let handle = ResolveHandle {
            cancel: CancelHandle { token },
            task,
        };
        (stream, handle)
    }
}
