//! 配置：解析器参数、远程端点以及 YAML 设置文件。
//!
//! Configuration for the resolver and the HTTP endpoint.
//!
//! Every knob has a default, can be set from a YAML settings file and can be
//! overridden from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `PROFILE_LOOKUP_BATCH_SIZE` | [`ResolverConfig::batch_size`] |
//! | `PROFILE_LOOKUP_MAX_ATTEMPTS` | [`ResolverConfig::max_attempts`] |
//! | `PROFILE_LOOKUP_RETRY_DELAY_MS` | [`ResolverConfig::retry_delay`] |
//! | `PROFILE_LOOKUP_INTER_BATCH_DELAY_MS` | [`ResolverConfig::inter_batch_delay`] |
//! | `PROFILE_LOOKUP_BASE_URL` | [`EndpointConfig::base_url`] |
//! | `PROFILE_LOOKUP_AGENT` | [`EndpointConfig::agent`] |
//! | `PROFILE_LOOKUP_HTTP_TIMEOUT_SECS` | [`EndpointConfig::timeout`] |
//! | `PROFILE_LOOKUP_PROXY_URL` | [`EndpointConfig::proxy_url`] |

use crate::resilience::RetryPolicy;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BATCH_SIZE: usize = 2;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(750);
pub const DEFAULT_INTER_BATCH_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_BASE_URL: &str = "https://api.mojang.com/";
pub const DEFAULT_AGENT: &str = "minecraft";

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}

/// Batching and retry parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Names per remote call.
    pub batch_size: usize,
    /// Total attempts per batch, including the first one.
    pub max_attempts: u32,
    /// Wait between failed attempts of the same batch.
    #[serde(rename = "retry_delay_ms", with = "duration_ms")]
    pub retry_delay: Duration,
    /// Wait after a successful batch before the next one starts.
    #[serde(rename = "inter_batch_delay_ms", with = "duration_ms")]
    pub inter_batch_delay: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            inter_batch_delay: DEFAULT_INTER_BATCH_DELAY,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(n) = env_parse::<usize>("PROFILE_LOOKUP_BATCH_SIZE") {
            self.batch_size = n;
        }
        if let Some(n) = env_parse::<u32>("PROFILE_LOOKUP_MAX_ATTEMPTS") {
            self.max_attempts = n;
        }
        if let Some(ms) = env_parse::<u64>("PROFILE_LOOKUP_RETRY_DELAY_MS") {
            self.retry_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse::<u64>("PROFILE_LOOKUP_INTER_BATCH_DELAY_MS") {
            self.inter_batch_delay = Duration::from_millis(ms);
        }
        self
    }

    pub fn with_batch_size(mut self, n: usize) -> Self {
        self.batch_size = n;
        self
    }

    pub fn with_max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    pub fn with_retry_delay(mut self, d: Duration) -> Self {
        self.retry_delay = d;
        self
    }

    pub fn with_inter_batch_delay(mut self, d: Duration) -> Self {
        self.inter_batch_delay = d;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.retry_delay)
    }

    /// Reject settings the resolver cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::config("resolver.batch_size", "must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(Error::config("resolver.max_attempts", "must be at least 1"));
        }
        Ok(())
    }
}

/// Where and how the HTTP transport talks to the profile search service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    /// Game agent appended to the search path, e.g. `minecraft`.
    pub agent: String,
    #[serde(rename = "timeout_secs", with = "duration_secs")]
    pub timeout: Duration,
    pub proxy_url: Option<String>,
    pub user_agent: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            agent: DEFAULT_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            proxy_url: None,
            user_agent: concat!("profile-lookup/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_proxy_url(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var("PROFILE_LOOKUP_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(agent) = env::var("PROFILE_LOOKUP_AGENT") {
            self.agent = agent;
        }
        if let Some(secs) = env_parse::<u64>("PROFILE_LOOKUP_HTTP_TIMEOUT_SECS") {
            self.timeout = Duration::from_secs(secs.max(1));
        }
        if let Ok(proxy) = env::var("PROFILE_LOOKUP_PROXY_URL") {
            self.proxy_url = Some(proxy);
        }
        self
    }

    /// Full search URL: `{base_url}/profiles/{agent}` with the agent lowercased.
    pub fn search_url(&self) -> Result<Url> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base).map_err(|e| {
            Error::config_value(
                "endpoint.base_url",
                &self.base_url,
                format!("is not a url: {e}"),
            )
        })?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(Error::config_value(
                "endpoint.base_url",
                &self.base_url,
                "must use http or https",
            ));
        }

        let agent = self.agent.trim().to_lowercase();
        if agent.is_empty() || agent.contains('/') {
            return Err(Error::config_value(
                "endpoint.agent",
                &self.agent,
                "must be a single non-empty path segment",
            ));
        }

        base.join(&format!("profiles/{}", agent)).map_err(|e| {
            Error::config_value(
                "endpoint.agent",
                &self.agent,
                format!("cannot form a url: {e}"),
            )
        })
    }
}

/// Settings file layout.
///
/// ```yaml
/// resolver:
///   batch_size: 10
///   max_attempts: 3
///   retry_delay_ms: 750
///   inter_batch_delay_ms: 100
/// endpoint:
///   base_url: https://api.mojang.com/
///   agent: minecraft
///   timeout_secs: 30
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupSettings {
    pub resolver: ResolverConfig,
    pub endpoint: EndpointConfig,
}

impl LookupSettings {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn with_env_overrides(self) -> Self {
        Self {
            resolver: self.resolver.with_env_overrides(),
            endpoint: self.endpoint.with_env_overrides(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.resolver.validate()?;
        self.endpoint.search_url().map(|_| ())
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
