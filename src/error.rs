use crate::transport::TransportError;
use std::sync::Arc;
use thiserror::Error;

/// Crate-level error type.
///
/// Steady-state lookup failures never surface here; they are delivered per name
/// through [`LookupError`]. This type covers construction, configuration and I/O.
#[derive(Debug, Error)]
pub enum Error {
    /// A setting the resolver or endpoint cannot run with.
    #[error("Configuration error: `{setting}` {reason}{}", rejected(.value))]
    Configuration {
        setting: &'static str,
        reason: String,
        value: Option<String>,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Resolve task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

fn rejected(value: &Option<String>) -> String {
    match value {
        Some(v) => format!(" (got {:?})", v),
        None => String::new(),
    }
}

impl Error {
    pub(crate) fn config(setting: &'static str, reason: impl Into<String>) -> Self {
        Error::Configuration {
            setting,
            reason: reason.into(),
            value: None,
        }
    }

    pub(crate) fn config_value(
        setting: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::Configuration {
            setting,
            reason: reason.into(),
            value: Some(value.into()),
        }
    }

    /// The offending setting, for configuration errors.
    pub fn setting(&self) -> Option<&'static str> {
        match self {
            Error::Configuration { setting, .. } => Some(*setting),
            _ => None,
        }
    }
}

/// Per-name failure reason handed to [`LookupSink::on_failed`](crate::sink::LookupSink::on_failed).
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    /// The server answered but did not include this name. Authoritative, never retried.
    #[error("Server did not find the requested profile '{name}'")]
    NotFound { name: String },

    /// The batch containing this name failed on every attempt.
    ///
    /// All names of one exhausted batch share the same `Arc`.
    #[error("Profile lookup failed after retries: {0}")]
    Transport(Arc<TransportError>),
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }

    /// The terminal transport error, if this failure came from an exhausted batch.
    pub fn transport_error(&self) -> Option<&Arc<TransportError>> {
        match self {
            LookupError::Transport(e) => Some(e),
            LookupError::NotFound { .. } => None,
        }
    }
}
