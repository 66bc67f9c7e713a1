//! Retry state machine for a single batch.

use crate::batch::LookupRequest;
use crate::resilience::{wait, Decision, RetryPolicy, WaitOutcome};
use crate::telemetry::{LookupEvent, LookupObserver};
use crate::transport::{ProfileTransport, TransportError};
use crate::types::ResolvedProfile;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Everything a batch needs besides the batch itself. Borrowed for one resolve call.
pub(crate) struct DriveContext<'a> {
    pub request_id: &'a str,
    pub transport: &'a dyn ProfileTransport,
    pub policy: RetryPolicy,
    pub observer: &'a dyn LookupObserver,
    pub cancel: &'a CancellationToken,
}

/// Where a batch currently is. Each batch starts at `Attempting { fail_count: 0 }`.
#[derive(Debug)]
pub(crate) enum BatchState {
    Attempting { fail_count: u32 },
    Backoff { fail_count: u32, delay: Duration },
    Succeeded { profiles: Vec<ResolvedProfile>, fail_count: u32 },
    Exhausted { error: Arc<TransportError>, attempts: u32 },
    Cancelled { fail_count: u32 },
}

/// Terminal result of driving one batch.
#[derive(Debug)]
pub(crate) enum BatchResolution {
    Resolved {
        profiles: Vec<ResolvedProfile>,
        retries: u32,
    },
    Exhausted {
        error: Arc<TransportError>,
        attempts: u32,
    },
    /// Stopped by the token. `retries` counts the retry waits already entered.
    Cancelled {
        retries: u32,
    },
}

impl DriveContext<'_> {
    async fn report(&self, event: LookupEvent) {
        let _ = self.observer.report(event).await;
    }

    /// Call the transport until it answers, the policy gives up, or the token fires.
    pub(crate) async fn drive_batch(&self, request: &LookupRequest) -> BatchResolution {
        let mut state = BatchState::Attempting { fail_count: 0 };
        loop {
            state = match state {
                BatchState::Attempting { fail_count } => self.attempt(request, fail_count).await,
                BatchState::Backoff { fail_count, delay } => {
                    match wait(delay, self.cancel).await {
                        WaitOutcome::Elapsed => BatchState::Attempting { fail_count },
                        WaitOutcome::Cancelled => BatchState::Cancelled { fail_count },
                    }
                }
                BatchState::Succeeded {
                    profiles,
                    fail_count,
                } => {
                    return BatchResolution::Resolved {
                        profiles,
                        retries: fail_count,
                    }
                }
                BatchState::Exhausted { error, attempts } => {
                    return BatchResolution::Exhausted { error, attempts }
                }
                BatchState::Cancelled { fail_count } => {
                    return BatchResolution::Cancelled {
                        retries: fail_count,
                    }
                }
            };
        }
    }

    async fn attempt(&self, request: &LookupRequest, fail_count: u32) -> BatchState {
        self.report(LookupEvent::BatchStarted {
            request_id: self.request_id.to_string(),
            batch_index: request.index(),
            attempt: fail_count + 1,
            names: request.names().to_vec(),
        })
        .await;

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return BatchState::Cancelled { fail_count },
            r = self.transport.search(request) => r,
        };

        match result {
            Ok(profiles) => {
                self.report(LookupEvent::BatchReturned {
                    request_id: self.request_id.to_string(),
                    batch_index: request.index(),
                    profiles: profiles.len(),
                })
                .await;
                BatchState::Succeeded {
                    profiles,
                    fail_count,
                }
            }
            Err(err) => {
                let fail_count = fail_count + 1;
                match self.policy.decide(fail_count) {
                    Decision::Retry { delay } => {
                        self.report(LookupEvent::RetryScheduled {
                            request_id: self.request_id.to_string(),
                            batch_index: request.index(),
                            fail_count,
                            delay_ms: delay.as_millis() as u64,
                            error: err.to_string(),
                        })
                        .await;
                        BatchState::Backoff { fail_count, delay }
                    }
                    Decision::Exhausted => {
                        self.report(LookupEvent::BatchExhausted {
                            request_id: self.request_id.to_string(),
                            batch_index: request.index(),
                            attempts: fail_count,
                            error: err.to_string(),
                        })
                        .await;
                        BatchState::Exhausted {
                            error: Arc::new(err),
                            attempts: fail_count,
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::InMemoryObserver;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` calls, then echoes every requested name back.
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl ProfileTransport for Flaky {
        async fn search(
            &self,
            request: &LookupRequest,
        ) -> std::result::Result<Vec<ResolvedProfile>, TransportError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(TransportError::Status {
                    status: 503,
                    body: format!("attempt {}", n + 1),
                });
            }
            Ok(request
                .names()
                .iter()
                .map(|name| ResolvedProfile::new(format!("id-{name}"), name.clone()))
                .collect())
        }
    }

    fn flaky(failures: u32) -> Flaky {
        Flaky {
            failures,
            calls: AtomicU32::new(0),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_two_failures() {
        let transport = flaky(2);
        let observer = InMemoryObserver::default();
        let cancel = CancellationToken::new();
        let ctx = DriveContext {
            request_id: "t",
            transport: &transport,
            policy: RetryPolicy::new(3, Duration::from_millis(750)),
            observer: &observer,
            cancel: &cancel,
        };

        let start = tokio::time::Instant::now();
        let res = ctx.drive_batch(&LookupRequest::from_names(["a", "b"])).await;
        match res {
            BatchResolution::Resolved { profiles, retries } => {
                assert_eq!(profiles.len(), 2);
                assert_eq!(retries, 2);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(observer.count("retry_scheduled"), 2);
        assert_eq!(observer.count("batch_started"), 3);
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_with_last_error() {
        let transport = flaky(u32::MAX);
        let observer = InMemoryObserver::default();
        let cancel = CancellationToken::new();
        let ctx = DriveContext {
            request_id: "t",
            transport: &transport,
            policy: RetryPolicy::new(3, Duration::from_millis(750)),
            observer: &observer,
            cancel: &cancel,
        };

        match ctx.drive_batch(&LookupRequest::from_names(["a"])).await {
            BatchResolution::Exhausted { error, attempts } => {
                assert_eq!(attempts, 3);
                assert!(error.to_string().contains("attempt 3"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
        assert_eq!(observer.count("retry_scheduled"), 2);
        assert_eq!(observer.count("batch_exhausted"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_backoff_aborts() {
        let transport = flaky(u32::MAX);
        let observer = InMemoryObserver::default();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });
        let ctx = DriveContext {
            request_id: "t",
            transport: &transport,
            policy: RetryPolicy::new(3, Duration::from_secs(10)),
            observer: &observer,
            cancel: &cancel,
        };

        assert!(matches!(
            ctx.drive_batch(&LookupRequest::from_names(["a"])).await,
            BatchResolution::Cancelled { retries: 1 }
        ));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }
}
