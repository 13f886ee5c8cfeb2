//! Configuration.
//!
//! - [`ClientConfig`]: base URL, timeout and retry policy for the HTTP client
//! - [`RetryConfig`]: back-off for transient failures
//! - [`ConfigFile`]: the on-disk `config.json` (base URL and tokens)

mod client;
mod file;
mod retry;

pub use client::{
    BASE_URL_ENV, ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, resolve_base_url,
};
pub use file::{ConfigFile, ConfigFileSource};
pub use retry::RetryConfig;
