//! Credential source traits.
//!
//! Each tier of the resolution chain reads from one source. The sources are
//! traits so tests can substitute recording doubles and observe exactly which
//! tiers were consulted (see [`crate::testing`]).
//!
//! All three are synchronous: one resolution runs at most once per process,
//! before the single HTTP request.

use std::sync::Arc;

use crate::Result;

/// Reads environment variables.
pub trait EnvSource: Send + Sync {
    /// Returns the variable's value, or `None` if it is unset or not UTF-8.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads secrets from an operating-system credential store.
///
/// Implementations must tell absence from failure:
///
/// - `Ok(Some(token))`: an entry exists
/// - `Ok(None)`: no entry for this service and account
/// - `Err(_)` with [`ErrorKind::CredentialBackend`](crate::ErrorKind::CredentialBackend):
///   the store itself failed (locked, unavailable, permission denied)
pub trait SecretStore: Send + Sync {
    /// Looks up the secret for `(service, account)`.
    ///
    /// # Errors
    ///
    /// Returns a `CredentialBackend` error when the store cannot be queried.
    fn get(&self, service: &str, account: &str) -> Result<Option<String>>;
}

/// Reads a token from the local config file.
///
/// - `Ok(Some(token))`: the file has a token for this account
/// - `Ok(None)`: the file is absent or holds no token for this account
/// - `Err(_)` with `CredentialBackend`: the file exists but cannot be read or
///   is not valid JSON
pub trait ConfigSource: Send + Sync {
    /// Looks up the token for an account key.
    ///
    /// # Errors
    ///
    /// Returns a `CredentialBackend` error when the file is unreadable or
    /// malformed.
    fn token_for(&self, account: &str) -> Result<Option<String>>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl EnvSource for SystemEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<T: EnvSource + ?Sized> EnvSource for Arc<T> {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

impl<T: EnvSource + ?Sized> EnvSource for Box<T> {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

impl<T: SecretStore + ?Sized> SecretStore for Arc<T> {
    fn get(&self, service: &str, account: &str) -> Result<Option<String>> {
        (**self).get(service, account)
    }
}

impl<T: SecretStore + ?Sized> SecretStore for Box<T> {
    fn get(&self, service: &str, account: &str) -> Result<Option<String>> {
        (**self).get(service, account)
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for Arc<T> {
    fn token_for(&self, account: &str) -> Result<Option<String>> {
        (**self).token_for(account)
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for Box<T> {
    fn token_for(&self, account: &str) -> Result<Option<String>> {
        (**self).token_for(account)
    }
}
