//! Error kind enumeration for categorizing client errors.

/// Categorization of client errors.
///
/// This enum provides a stable interface for matching on failure modes. The
/// command layer uses it to pick user-facing messages and exit codes; the
/// transport uses [`is_retriable`](ErrorKind::is_retriable) to decide whether
/// a request is worth repeating.
///
/// ## Retriable vs Non-Retriable
///
/// | ErrorKind            | Retriable | Action                          |
/// |----------------------|-----------|---------------------------------|
/// | `Unavailable`        | Yes       | Retry with backoff              |
/// | `Timeout`            | Yes       | Retry with backoff              |
/// | `RateLimited`        | Yes       | Use `retry_after()` delay       |
/// | `Connection`         | Yes       | Retry with backoff              |
/// | `CredentialNotFound` | No        | Log in, then re-run             |
/// | `CredentialBackend`  | No        | Fix keychain / config file      |
/// | `MalformedResponse`  | No        | Inspect the raw body            |
/// | `Validation`         | No        | Fix the command input           |
/// | `Unauthorized`       | No        | Fix credentials                 |
/// | `Forbidden`          | No        | Fix permissions                 |
/// | `NotFound`           | No        | Resource doesn't exist          |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The response body does not parse as the expected JSON:API document.
    ///
    /// The raw body is attached to the error when one was received.
    #[error("malformed response")]
    MalformedResponse,

    /// Every credential source deferred; no token is available.
    ///
    /// Recoverable by logging in again. Not a crash.
    #[error("credential not found")]
    CredentialNotFound,

    /// A credential source failed for a reason other than absence.
    ///
    /// Examples: the OS keychain is locked or unavailable, the config file
    /// exists but cannot be read, the config file is not valid JSON.
    #[error("credential backend error")]
    CredentialBackend,

    /// Caller-supplied input is insufficient (missing id, unknown resource,
    /// unsupported filter). Raised before any credential or network work.
    #[error("validation error")]
    Validation,

    /// Authentication failed (invalid or expired credentials).
    ///
    /// HTTP: 401 Unauthorized
    #[error("unauthorized")]
    Unauthorized,

    /// Valid credentials but insufficient permissions.
    ///
    /// HTTP: 403 Forbidden
    #[error("forbidden")]
    Forbidden,

    /// Requested resource was not found.
    ///
    /// HTTP: 404 Not Found
    #[error("not found")]
    NotFound,

    /// Invalid request argument or payload, as judged by the server.
    ///
    /// HTTP: 400 Bad Request, 422 Unprocessable Entity
    #[error("invalid argument")]
    InvalidArgument,

    /// Conflict with existing resource state.
    ///
    /// HTTP: 409 Conflict
    #[error("conflict")]
    Conflict,

    /// Rate limit exceeded.
    ///
    /// HTTP: 429 Too Many Requests
    ///
    /// **Retriable.** Use `Error::retry_after()` for the recommended delay.
    #[error("rate limited")]
    RateLimited,

    /// Service temporarily unavailable.
    ///
    /// HTTP: 5xx
    ///
    /// **Retriable.** Retry with exponential backoff.
    #[error("service unavailable")]
    Unavailable,

    /// Request timed out on the client side.
    ///
    /// **Retriable.** Retry with exponential backoff.
    #[error("timeout")]
    Timeout,

    /// Connection error (DNS, TLS handshake, network unreachable).
    ///
    /// **Retriable.** May indicate transient network issues.
    #[error("connection error")]
    Connection,

    /// Transport layer error that fits no more specific category.
    #[error("transport error")]
    Transport,

    /// Configuration error (invalid base URL, unusable HTTP client settings).
    #[error("configuration error")]
    Configuration,

    /// Unexpected internal failure.
    #[error("internal error")]
    Internal,
}

impl ErrorKind {
    /// Returns `true` if this error kind is generally safe to retry.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hauler::ErrorKind;
    ///
    /// assert!(ErrorKind::Timeout.is_retriable());
    /// assert!(!ErrorKind::CredentialNotFound.is_retriable());
    /// ```
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Unavailable
                | ErrorKind::Timeout
                | ErrorKind::RateLimited
                | ErrorKind::Connection
        )
    }

    /// Returns `true` if this error came out of credential resolution.
    pub fn is_credential_error(&self) -> bool {
        matches!(self, ErrorKind::CredentialNotFound | ErrorKind::CredentialBackend)
    }

    /// Returns `true` if this error was raised from the HTTP status code of a
    /// response the server actually sent.
    pub fn is_server_rejection(&self) -> bool {
        matches!(
            self,
            ErrorKind::Unauthorized
                | ErrorKind::Forbidden
                | ErrorKind::NotFound
                | ErrorKind::InvalidArgument
                | ErrorKind::Conflict
                | ErrorKind::RateLimited
                | ErrorKind::Unavailable
        )
    }
}
