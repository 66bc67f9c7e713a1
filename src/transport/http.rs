use super::{ProfileTransport, TransportError};
use crate::batch::LookupRequest;
use crate::config::EndpointConfig;
use crate::types::ResolvedProfile;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Proxy;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;
use uuid::Uuid;

/// Correlation id attached to every search call. The service may ignore it.
pub const REQUEST_ID_HEADER: &str = "x-profile-lookup-request-id";

/// Longest error body kept in [`TransportError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Profile search over HTTP: `POST {base_url}/profiles/{agent}` with a JSON array of names.
pub struct HttpProfileTransport {
    client: reqwest::Client,
    search_url: Url,
}

impl HttpProfileTransport {
    pub fn new(config: &EndpointConfig) -> Result<Self> {
        let search_url = config.search_url()?;

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::config_value(
                    "endpoint.proxy_url",
                    proxy_url,
                    format!("is not a usable proxy: {e}"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(TransportError::Http)?;

        Ok(Self { client, search_url })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}

#[async_trait]
impl ProfileTransport for HttpProfileTransport {
    async fn search(
        &self,
        request: &LookupRequest,
    ) -> std::result::Result<Vec<ResolvedProfile>, TransportError> {
        let request_id = Uuid::new_v4().to_string();
        let start = std::time::Instant::now();

        let resp = self
            .client
            .post(self.search_url.clone())
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .json(request.names())
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        debug!(
            http_status = status.as_u16(),
            batch_index = request.index(),
            names = request.len(),
            request_id = request_id.as_str(),
            duration_ms = start.elapsed().as_millis() as u64,
            "profile search returned"
        );

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: truncate(body, MAX_ERROR_BODY),
            });
        }

        decode_search_response(&body)
    }
}

/// The search endpoint answers either with a bare array of profiles or with an
/// object envelope that may carry an error instead.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Profiles(Vec<ResolvedProfile>),
    Envelope(SearchEnvelope),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchEnvelope {
    #[serde(default)]
    profiles: Vec<ResolvedProfile>,
    error: Option<String>,
    error_message: Option<String>,
    cause: Option<String>,
}

/// Decode a successful search body. An empty body means no profiles matched.
pub(crate) fn decode_search_response(
    body: &str,
) -> std::result::Result<Vec<ResolvedProfile>, TransportError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<SearchResponse>(body)? {
        SearchResponse::Profiles(profiles) => Ok(profiles),
        SearchResponse::Envelope(envelope) => match envelope.error.filter(|e| !e.is_empty()) {
            Some(error) => Err(TransportError::Remote {
                error,
                message: envelope
                    .error_message
                    .or(envelope.cause)
                    .unwrap_or_default(),
            }),
            None => Ok(envelope.profiles),
        },
    }
}

fn truncate(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut cut = max;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    body
}
