use super::profile::ResolvedProfile;
use crate::error::LookupError;
use crate::transport::TransportError;
use std::sync::Arc;

/// Terminal result for one requested name.
#[derive(Debug, Clone)]
pub enum LookupOutcome {
    /// The transport returned a matching profile.
    Resolved(ResolvedProfile),
    /// The transport answered but did not include this name.
    NotFound(String),
    /// The name's batch exhausted its attempts; the error is the last one observed.
    Failed {
        name: String,
        error: Arc<TransportError>,
    },
}

impl LookupOutcome {
    /// Rebuild an outcome from the pair handed to `LookupSink::on_failed`.
    pub fn from_failure(placeholder: ResolvedProfile, error: LookupError) -> Self {
        match error {
            LookupError::NotFound { .. } => LookupOutcome::NotFound(placeholder.name),
            LookupError::Transport(error) => LookupOutcome::Failed {
                name: placeholder.name,
                error,
            },
        }
    }

    /// The requested (normalized) name this outcome belongs to.
    ///
    /// For resolved profiles this is the lowercased canonical name.
    pub fn name(&self) -> String {
        match self {
            LookupOutcome::Resolved(p) => p.match_key(),
            LookupOutcome::NotFound(name) | LookupOutcome::Failed { name, .. } => name.clone(),
        }
    }

    pub fn profile(&self) -> Option<&ResolvedProfile> {
        match self {
            LookupOutcome::Resolved(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, LookupOutcome::Resolved(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupOutcome::NotFound(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LookupOutcome::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_pairs_map_to_outcomes() {
        let nf = LookupOutcome::from_failure(
            ResolvedProfile::placeholder("bob"),
            LookupError::NotFound { name: "bob".into() },
        );
        assert!(nf.is_not_found());
        assert_eq!(nf.name(), "bob");

        let cause = Arc::new(TransportError::Other("boom".into()));
        let failed = LookupOutcome::from_failure(
            ResolvedProfile::placeholder("carol"),
            LookupError::Transport(cause),
        );
        assert!(failed.is_failed());
        assert_eq!(failed.name(), "carol");
        assert!(failed.profile().is_none());
    }

    #[test]
    fn resolved_name_is_case_folded() {
        let o = LookupOutcome::Resolved(ResolvedProfile::new("id-1", "Alice"));
        assert_eq!(o.name(), "alice");
        assert_eq!(o.profile().map(|p| p.name.as_str()), Some("Alice"));
    }
}
