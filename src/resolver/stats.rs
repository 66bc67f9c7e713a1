use serde::Serialize;
use std::time::Duration;

/// Per-call statistics for one resolve operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolveStats {
    /// Correlation id shared by every event of this operation.
    pub request_id: String,
    /// Distinct normalized names submitted.
    pub names: usize,
    pub batches_total: usize,
    /// Batches handed to the transport at least once.
    pub batches_issued: usize,
    /// Batches whose outcomes were emitted (succeeded or exhausted).
    pub batches_completed: usize,
    pub batches_exhausted: usize,
    pub resolved: usize,
    pub not_found: usize,
    pub failed: usize,
    /// Failed attempts that were followed by another attempt.
    pub retries: u32,
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl ResolveStats {
    pub(crate) fn new(request_id: String, names: usize, batches_total: usize) -> Self {
        Self {
            request_id,
            names,
            batches_total,
            ..Self::default()
        }
    }

    pub fn outcomes(&self) -> usize {
        self.resolved + self.not_found + self.failed
    }

    /// Names that never received an outcome. Non-zero only after cancellation.
    pub fn unresolved(&self) -> usize {
        self.names.saturating_sub(self.outcomes())
    }
}
