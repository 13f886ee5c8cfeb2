//! Retry policy for transient request failures.

use std::time::Duration;

use crate::error::{Error, ErrorKind};

/// Exponential back-off with jitter for transient failures.
///
/// A failed `GET` is retried when the error kind is retriable
/// ([`ErrorKind::is_retriable`]): 429, 5xx, connection and timeout errors.
/// A `Retry-After` hint on a 429 replaces the computed delay, capped at
/// `max_delay`.
///
/// ## Default Values
///
/// - `max_retries`: 3
/// - `initial_delay`: 100ms
/// - `max_delay`: 10s
/// - `multiplier`: 2.0
/// - `jitter`: 0.1 (10%)
///
/// ## Example
///
/// ```rust
/// use hauler::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::new()
///     .with_max_retries(5)
///     .with_initial_delay(Duration::from_millis(200))
///     .with_max_delay(Duration::from_secs(30));
/// assert!(config.is_enabled());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first request.
    pub max_retries: u32,

    /// Delay before the first retry.
    pub initial_delay: Duration,

    /// Upper bound on any single delay, including `Retry-After` hints.
    pub max_delay: Duration,

    /// Multiplier for exponential back-off.
    pub multiplier: f64,

    /// Jitter factor (0.0 to 1.0).
    pub jitter: f64,

    /// Whether timeouts are retried.
    pub retry_on_timeout: bool,

    /// Whether connection failures are retried.
    pub retry_on_connection_error: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter: 0.1,
            retry_on_timeout: true,
            retry_on_connection_error: true,
        }
    }
}

impl RetryConfig {
    /// Creates a retry configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that never retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Sets the maximum number of retry attempts.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before the first retry.
    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the back-off multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Sets the jitter factor, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Sets whether timeouts are retried.
    #[must_use]
    pub fn with_retry_on_timeout(mut self, retry: bool) -> Self {
        self.retry_on_timeout = retry;
        self
    }

    /// Sets whether connection failures are retried.
    #[must_use]
    pub fn with_retry_on_connection_error(mut self, retry: bool) -> Self {
        self.retry_on_connection_error = retry;
        self
    }

    /// Returns `true` if retries are enabled.
    pub fn is_enabled(&self) -> bool {
        self.max_retries > 0
    }

    /// Decides whether a failure on the given attempt (1-based) is retried.
    pub fn should_retry(&self, error: &Error, attempt: u32) -> bool {
        if attempt > self.max_retries {
            return false;
        }
        match error.kind() {
            ErrorKind::Timeout => self.retry_on_timeout,
            ErrorKind::Connection => self.retry_on_connection_error,
            kind => kind.is_retriable(),
        }
    }

    /// Returns the delay before retry `attempt` (1-based), honoring a
    /// `Retry-After` hint on the error.
    pub fn delay_for(&self, error: &Error, attempt: u32) -> Duration {
        match error.retry_after() {
            Some(hint) => hint.min(self.max_delay),
            None => self.delay_for_attempt(attempt),
        }
    }

    /// Computes `initial_delay * multiplier^(attempt - 1)`, capped at
    /// `max_delay`, with jitter applied.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let base_delay = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped_delay = base_delay.min(self.max_delay.as_secs_f64());

        let jittered = if self.jitter > 0.0 {
            let jitter_range = capped_delay * self.jitter;
            let jitter_offset = (fastrand::f64() - 0.5) * 2.0 * jitter_range;
            (capped_delay + jitter_offset).max(0.0)
        } else {
            capped_delay
        };

        Duration::from_secs_f64(jittered)
    }
}
