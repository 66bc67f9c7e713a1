//! 传输层：远程档案搜索接口及其 HTTP 实现。
//!
//! The resolver only sees [`ProfileTransport`]. Any failure it reports is
//! treated the same way (retried, then surfaced per name), so implementations
//! are free to fold whatever they like into [`TransportError`].

use crate::batch::LookupRequest;
use crate::types::ResolvedProfile;
use async_trait::async_trait;
use std::sync::Arc;

pub mod http;

pub use http::HttpProfileTransport;

/// Remote profile search.
///
/// Implementations must tolerate concurrent callers: several resolve operations
/// may share one transport.
#[async_trait]
pub trait ProfileTransport: Send + Sync {
    /// Look up every name in `request` in a single remote call.
    ///
    /// Names the service does not know are simply absent from the result.
    async fn search(
        &self,
        request: &LookupRequest,
    ) -> std::result::Result<Vec<ResolvedProfile>, TransportError>;
}

#[async_trait]
impl<T: ProfileTransport + ?Sized> ProfileTransport for Arc<T> {
    async fn search(
        &self,
        request: &LookupRequest,
    ) -> std::result::Result<Vec<ResolvedProfile>, TransportError> {
        (**self).search(request).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Remote error {error}: {message}")]
    Remote { error: String, message: String },

    #[error("Malformed search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
