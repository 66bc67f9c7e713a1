//! Matching a batch's returned profiles against the names it asked for.

use crate::batch::LookupRequest;
use crate::types::ResolvedProfile;

/// Requested names split by what the service returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Profiles matched to a requested name, in response order.
    pub resolved: Vec<ResolvedProfile>,
    /// Requested names with no matching profile, in request order.
    pub missing: Vec<String>,
    /// Returned profiles that matched no outstanding requested name.
    pub unexpected: Vec<ResolvedProfile>,
}

impl Reconciliation {
    /// Number of requested names covered (resolved + missing).
    pub fn outcome_count(&self) -> usize {
        self.resolved.len() + self.missing.len()
    }
}

/// Match `profiles` to the names of `request` by lowercased name.
///
/// Each requested name is matched at most once; a second profile with the same
/// name lands in `unexpected`.
pub fn reconcile(request: &LookupRequest, profiles: Vec<ResolvedProfile>) -> Reconciliation {
    let mut outstanding: Vec<&str> = request.names().iter().map(String::as_str).collect();
    let mut result = Reconciliation::default();

    for profile in profiles {
        let key = profile.match_key();
        match outstanding.iter().position(|n| *n == key) {
            Some(pos) => {
                outstanding.remove(pos);
                result.resolved.push(profile);
            }
            None => result.unexpected.push(profile),
        }
    }

    result.missing = outstanding.into_iter().map(str::to_string).collect();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_and_missing() {
        let req = LookupRequest::from_names(["alice", "bob"]);
        let rec = reconcile(&req, vec![ResolvedProfile::new("a1", "Alice")]);
        assert_eq!(rec.resolved, vec![ResolvedProfile::new("a1", "Alice")]);
        assert_eq!(rec.missing, vec!["bob".to_string()]);
        assert!(rec.unexpected.is_empty());
        assert_eq!(rec.outcome_count(), 2);
    }

    #[test]
    fn test_case_insensitive_match() {
        let req = LookupRequest::from_names(["NOTCH"]);
        let rec = reconcile(&req, vec![ResolvedProfile::new("n", "notch")]);
        assert_eq!(rec.resolved.len(), 1);
        assert!(rec.missing.is_empty());
    }

    #[test]
    fn test_duplicate_and_unrequested_profiles_are_unexpected() {
        let req = LookupRequest::from_names(["alice", "bob"]);
        let rec = reconcile(
            &req,
            vec![
                ResolvedProfile::new("a1", "Alice"),
                ResolvedProfile::new("a2", "ALICE"),
                ResolvedProfile::new("m1", "Mallory"),
            ],
        );
        assert_eq!(rec.resolved, vec![ResolvedProfile::new("a1", "Alice")]);
        assert_eq!(rec.unexpected.len(), 2);
        assert_eq!(rec.missing, vec!["bob".to_string()]);
    }

    #[test]
    fn test_empty_response_means_all_missing() {
        let req = LookupRequest::from_names(["x", "y"]);
        let rec = reconcile(&req, Vec::new());
        assert_eq!(rec.missing, vec!["x".to_string(), "y".to_string()]);
    }
}
