//! REST transport using reqwest.
//!
//! Issues JSON:API `GET` requests, retries transient failures, and maps
//! non-2xx responses to [`Error`]s that keep the server's body.

use std::time::Duration;

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, RETRY_AFTER};
use url::Url;

use super::query::Query;
use crate::auth::Credential;
use crate::config::{ClientConfig, RetryConfig};
use crate::error::{Error, ErrorKind, Result};
use crate::user_agent;

/// JSON:API media type.
pub const JSON_API: &str = "application/vnd.api+json";

const REQUEST_ID_HEADER: &str = "x-request-id";

/// REST transport for one base URL.
///
/// Every request carries `Accept: application/vnd.api+json`, the client
/// `User-Agent`, and an `X-Request-Id` fixed for the transport's lifetime so
/// server logs can correlate the retries of one invocation.
#[derive(Clone)]
pub struct RestTransport {
    client: reqwest::Client,
    base_url: Url,
    retry: RetryConfig,
    request_id: String,
}

impl std::fmt::Debug for RestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestTransport")
            .field("base_url", &self.base_url.as_str())
            .field("request_id", &self.request_id)
            .finish_non_exhaustive()
    }
}

impl RestTransport {
    /// Creates a transport builder.
    pub fn builder() -> RestTransportBuilder {
        RestTransportBuilder::new()
    }

    /// Creates a transport from a client configuration.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for an invalid base URL or when the
    /// HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::builder()
            .base_url(config.base_url())?
            .timeout(config.timeout())
            .retry_config(config.retry().clone())
            .user_agent(user_agent::user_agent_with(config.user_agent_suffix()))
            .build()
    }

    fn new(
        base_url: Url,
        retry: RetryConfig,
        timeout: Duration,
        user_agent: String,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                Error::configuration(format!("failed to create HTTP client: {}", e)).with_source(e)
            })?;

        Ok(Self {
            client,
            base_url,
            retry,
            request_id: uuid::Uuid::new_v4().to_string(),
        })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the request id sent with every request.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Builds the full URL for an API path and query.
    ///
    /// The path is appended to the base URL's path, so a base of
    /// `https://host/api` and a path of `/v1/brokers` yield
    /// `https://host/api/v1/brokers`.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the result is not a valid URL.
    pub fn url_for(&self, path: &str, query: &Query) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined)?;
        query.apply_to(&mut url);
        Ok(url)
    }

    fn build_headers(&self, credential: Option<&Credential>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_API));
        if let Ok(value) = HeaderValue::from_str(&self.request_id) {
            headers.insert(REQUEST_ID_HEADER, value);
        }

        if let Some(credential) = credential {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", credential.token()))
                .map_err(|_| {
                    Error::unauthorized("API token contains characters not allowed in a header")
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Performs a `GET` and returns the raw response body.
    ///
    /// No `Authorization` header is sent when `credential` is `None`.
    ///
    /// # Errors
    ///
    /// Returns the mapped status error (with the body attached) for non-2xx
    /// responses, or a transport error, after retries are exhausted.
    pub async fn get(
        &self,
        path: &str,
        query: &Query,
        credential: Option<&Credential>,
    ) -> Result<Bytes> {
        let url = self.url_for(path, query)?;
        let headers = self.build_headers(credential)?;
        self.execute_with_retry(&url, &headers).await
    }

    async fn execute_with_retry(&self, url: &Url, headers: &HeaderMap) -> Result<Bytes> {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            tracing::debug!(method = "GET", path = url.path(), attempt, "sending request");

            let outcome = match self
                .client
                .get(url.clone())
                .headers(headers.clone())
                .send()
                .await
            {
                Ok(response) => read_response(response).await,
                Err(e) => Err(map_reqwest_error(e)),
            };

            let err = match outcome {
                Ok(body) => return Ok(body),
                Err(err) => err,
            };

            if !self.retry.should_retry(&err, attempt) {
                return Err(err);
            }

            let delay = self.retry.delay_for(&err, attempt);
            tracing::warn!(
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "retrying request"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

async fn read_response(response: reqwest::Response) -> Result<Bytes> {
    let status = response.status();
    tracing::debug!(status = status.as_u16(), "received response");

    if status.is_success() {
        return response.bytes().await.map_err(map_reqwest_error);
    }

    let retry_after = parse_retry_after(response.headers());
    let body = response
        .bytes()
        .await
        .map(|b| String::from_utf8_lossy(&b).into_owned())
        .unwrap_or_default();
    let mut err = map_status_error(status, &body);
    if let Some(delay) = retry_after {
        err = err.with_retry_after(delay);
    }
    Err(err)
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Builder for [`RestTransport`].
#[derive(Debug)]
pub struct RestTransportBuilder {
    base_url: Option<Url>,
    retry_config: RetryConfig,
    timeout: Duration,
    user_agent: Option<String>,
}

impl RestTransportBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            retry_config: RetryConfig::default(),
            timeout: crate::config::DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Sets the base URL.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the URL does not parse or is not
    /// `http`/`https`.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(url.as_ref().trim())
            .map_err(|e| Error::configuration(format!("invalid base URL: {}", e)).with_source(e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::configuration(format!(
                "unsupported base URL scheme: {}",
                url.scheme()
            )));
        }
        self.base_url = Some(url);
        Ok(self)
    }

    /// Sets the retry configuration.
    #[must_use]
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the User-Agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the transport.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if no base URL was set.
    pub fn build(self) -> Result<RestTransport> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::configuration("base URL is required"))?;
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| user_agent::user_agent().to_owned());
        RestTransport::new(base_url, self.retry_config, self.timeout, user_agent)
    }
}

/// Maps reqwest errors to client errors.
fn map_reqwest_error(e: reqwest::Error) -> Error {
    let kind = if e.is_timeout() {
        ErrorKind::Timeout
    } else if e.is_connect() {
        ErrorKind::Connection
    } else {
        ErrorKind::Transport
    };
    let message = match kind {
        ErrorKind::Timeout => format!("request timed out: {}", e),
        ErrorKind::Connection => format!("connection failed: {}", e),
        _ => format!("HTTP error: {}", e),
    };
    Error::new(kind, message).with_source(e)
}

/// Maps a non-2xx status to a client error, preferring the JSON:API
/// `errors[0].detail` (then `title`) as the message.
fn map_status_error(status: StatusCode, body: &str) -> Error {
    let message = json_api_error_message(body).unwrap_or_else(|| {
        let reason = status.canonical_reason().unwrap_or("unexpected status");
        format!("HTTP {} {}", status.as_u16(), reason)
    });

    let kind = match status.as_u16() {
        400 | 422 => ErrorKind::InvalidArgument,
        401 => ErrorKind::Unauthorized,
        403 => ErrorKind::Forbidden,
        404 => ErrorKind::NotFound,
        409 => ErrorKind::Conflict,
        429 => ErrorKind::RateLimited,
        500..=599 => ErrorKind::Unavailable,
        _ => ErrorKind::Transport,
    };

    Error::new(kind, message).with_body(body)
}

fn json_api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let first = value.get("errors")?.get(0)?;
    ["detail", "title"]
        .into_iter()
        .filter_map(|key| first.get(key).and_then(serde_json::Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_owned)
}
