//! HTTP client configuration.

use std::time::Duration;

use super::{ConfigFile, RetryConfig};
use crate::auth::EnvSource;

/// Built-in base URL used when nothing else names one.
pub const DEFAULT_BASE_URL: &str = "https://app.hauler.example";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "HAULER_BASE_URL";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`ApiClient`](crate::ApiClient).
///
/// ## Example
///
/// ```rust
/// use std::time::Duration;
/// use hauler::{ClientConfig, RetryConfig};
///
/// let config = ClientConfig::builder()
///     .base_url("https://app.example.com")
///     .timeout(Duration::from_secs(5))
///     .retry(RetryConfig::disabled())
///     .build();
/// assert_eq!(config.base_url(), "https://app.example.com");
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct ClientConfig {
    /// Server base URL, e.g. `https://app.hauler.example`.
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    base_url: String,

    /// Timeout for each HTTP attempt.
    #[builder(default = DEFAULT_TIMEOUT)]
    timeout: Duration,

    /// Retry policy for transient failures.
    #[builder(default)]
    retry: RetryConfig,

    /// Extra value appended to the `User-Agent` header.
    #[builder(into)]
    user_agent_suffix: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientConfig {
    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry policy.
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Returns the `User-Agent` suffix, if any.
    pub fn user_agent_suffix(&self) -> Option<&str> {
        self.user_agent_suffix.as_deref()
    }
}

/// Picks the base URL: the flag, then `HAULER_BASE_URL`, then the config
/// file's `base_url`, then [`DEFAULT_BASE_URL`]. Blank values are skipped and
/// trailing slashes are removed.
pub fn resolve_base_url(
    flag: Option<&str>,
    env: &dyn EnvSource,
    file: Option<&ConfigFile>,
) -> String {
    let from_env = env.var(BASE_URL_ENV);
    [
        flag,
        from_env.as_deref(),
        file.and_then(ConfigFile::base_url),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|v| !v.is_empty())
    .unwrap_or(DEFAULT_BASE_URL)
    .trim_end_matches('/')
    .to_owned()
}
