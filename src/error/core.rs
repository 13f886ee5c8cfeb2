//! Main error type for the client.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use super::ErrorKind;

/// Upper bound on how much of a raw response body is kept on an error.
const MAX_BODY_LEN: usize = 64 * 1024;

/// The primary error type for client operations.
///
/// ## Error Structure
///
/// ```text
/// Error
/// ├── kind: ErrorKind          (category for matching)
/// ├── message: String          (human-readable description)
/// ├── body: Option             (raw response body, for debuggability)
/// ├── retry_after: Option      (rate limit delay hint)
/// └── source: Option           (underlying cause)
/// ```
///
/// ## Example
///
/// ```rust
/// use hauler::{Error, ErrorKind};
///
/// fn exit_code(err: &Error) -> i32 {
///     match err.kind() {
///         ErrorKind::Validation => 2,
///         ErrorKind::CredentialNotFound => 3,
///         _ => 1,
///     }
/// }
///
/// let err = Error::credential_not_found("no token in any source");
/// assert_eq!(exit_code(&err), 3);
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    body: Option<String>,
    retry_after: Option<Duration>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            body: None,
            retry_after: None,
            source: None,
        }
    }

    /// Creates an error from a kind with a default message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        let message = match kind {
            ErrorKind::MalformedResponse => "response is not a valid JSON:API document",
            ErrorKind::CredentialNotFound => "no API token found",
            ErrorKind::CredentialBackend => "credential store failed",
            ErrorKind::Validation => "invalid input",
            ErrorKind::Unauthorized => "authentication failed",
            ErrorKind::Forbidden => "permission denied",
            ErrorKind::NotFound => "resource not found",
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::Conflict => "conflict",
            ErrorKind::RateLimited => "rate limit exceeded",
            ErrorKind::Unavailable => "service unavailable",
            ErrorKind::Timeout => "request timed out",
            ErrorKind::Connection => "connection failed",
            ErrorKind::Transport => "transport error",
            ErrorKind::Configuration => "configuration error",
            ErrorKind::Internal => "internal error",
        };
        Self::new(kind, message)
    }

    /// Returns the error kind for categorization.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message without the kind prefix.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the raw response body attached to this error, if any.
    ///
    /// Present for non-2xx responses and for [`ErrorKind::MalformedResponse`]
    /// so the command layer can show the server's exact words.
    #[inline]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Returns the recommended retry delay for rate limit errors.
    #[inline]
    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    /// Returns `true` if this error is generally safe to retry.
    #[inline]
    pub fn is_retriable(&self) -> bool {
        self.kind.is_retriable()
    }

    /// Attaches a raw response body. Empty bodies are ignored and very large
    /// bodies are cut at a character boundary.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        let mut body = body.into();
        if body.is_empty() {
            return self;
        }
        if body.len() > MAX_BODY_LEN {
            let mut end = MAX_BODY_LEN;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            body.truncate(end);
        }
        self.body = Some(body);
        self
    }

    /// Sets the retry-after duration for this error.
    #[must_use]
    pub fn with_retry_after(mut self, duration: Duration) -> Self {
        self.retry_after = Some(duration);
        self
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors

    /// Creates a malformed response error carrying the raw body.
    pub fn malformed_response(
        message: impl Into<Cow<'static, str>>,
        body: impl AsRef<[u8]>,
    ) -> Self {
        let body = String::from_utf8_lossy(body.as_ref()).into_owned();
        Self::new(ErrorKind::MalformedResponse, message).with_body(body)
    }

    /// Creates a credential-not-found error.
    pub fn credential_not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::CredentialNotFound, message)
    }

    /// Creates a credential backend error.
    pub fn credential_backend(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::CredentialBackend, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Creates a rate limited error.
    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        let mut err = Self::from_kind(ErrorKind::RateLimited);
        err.retry_after = retry_after;
        err
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Creates a connection error.
    pub fn connection(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::from_kind(kind)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::Forbidden,
            std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::NotConnected => ErrorKind::Connection,
            std::io::ErrorKind::TimedOut => ErrorKind::Timeout,
            _ => ErrorKind::Internal,
        };
        Error::new(kind, err.to_string()).with_source(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::configuration(format!("invalid URL: {}", err)).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorKind::MalformedResponse, format!("JSON error: {}", err)).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_new() {
        let err = Error::new(ErrorKind::Validation, "resource id is required");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "resource id is required");
        assert!(err.body().is_none());
        assert!(err.retry_after().is_none());
    }

    #[test]
    fn test_error_from_kind() {
        let err = Error::from_kind(ErrorKind::CredentialNotFound);
        assert_eq!(err.kind(), ErrorKind::CredentialNotFound);
        assert!(err.to_string().contains("no API token found"));
    }

    #[test]
    fn test_malformed_response_keeps_body() {
        let err = Error::malformed_response("expected an object", b"<html>oops</html>");
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        assert_eq!(err.body(), Some("<html>oops</html>"));
    }

    #[test]
    fn test_empty_body_is_ignored() {
        let err = Error::not_found("missing").with_body("");
        assert!(err.body().is_none());
    }

    #[test]
    fn test_large_body_is_truncated_on_char_boundary() {
        let body = "é".repeat(MAX_BODY_LEN);
        let err = Error::internal("big").with_body(body);
        let kept = err.body().unwrap_or_default();
        assert!(kept.len() <= MAX_BODY_LEN);
        assert!(kept.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_error_with_retry_after() {
        let err = Error::rate_limited(Some(Duration::from_secs(30)));
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert_eq!(err.retry_after(), Some(Duration::from_secs(30)));
        assert!(err.is_retriable());
    }

    #[test]
    fn test_error_with_source() {
        let io_err = std::io::Error::other("underlying error");
        let err = Error::credential_backend("keychain locked").with_source(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_convenience_constructors() {
        assert_eq!(Error::credential_not_found("t").kind(), ErrorKind::CredentialNotFound);
        assert_eq!(Error::credential_backend("t").kind(), ErrorKind::CredentialBackend);
        assert_eq!(Error::validation("t").kind(), ErrorKind::Validation);
        assert_eq!(Error::unauthorized("t").kind(), ErrorKind::Unauthorized);
        assert_eq!(Error::not_found("t").kind(), ErrorKind::NotFound);
        assert_eq!(Error::timeout("t").kind(), ErrorKind::Timeout);
        assert_eq!(Error::connection("t").kind(), ErrorKind::Connection);
        assert_eq!(Error::configuration("t").kind(), ErrorKind::Configuration);
        assert_eq!(Error::internal("t").kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err: Error = io_err.into();
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn test_from_json_error_is_malformed() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_display_format() {
        let err = Error::not_found("broker 42 not found");
        assert_eq!(err.to_string(), "not found: broker 42 not found");
    }
}
