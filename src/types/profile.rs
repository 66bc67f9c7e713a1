use serde::{Deserialize, Serialize};
use std::fmt;

/// A player profile as returned by the profile search endpoint.
///
/// The identifier is opaque. It is `None` only on placeholder profiles handed to
/// [`LookupSink::on_failed`](crate::sink::LookupSink::on_failed); the resolver never
/// invents one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

impl ResolvedProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
        }
    }

    /// Profile carrying only the requested name, used when reporting failures.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.as_deref().map_or(true, str::is_empty)
    }

    /// Key used to match this profile against requested names.
    pub fn match_key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl fmt::Display for ResolvedProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} ({})", self.name, id),
            None => write!(f, "{} (unresolved)", self.name),
        }
    }
}
