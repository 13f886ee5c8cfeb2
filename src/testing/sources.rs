//! Recording doubles for the credential sources.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::Error;
use crate::Result;
use crate::auth::{ConfigSource, EnvSource, SecretStore};

/// An in-memory [`EnvSource`] that records every variable read.
///
/// ```rust
/// use hauler::EnvSource;
/// use hauler::testing::RecordingEnv;
///
/// let env = RecordingEnv::new().with("HAULER_TOKEN", "abc");
/// assert_eq!(env.var("HAULER_TOKEN").as_deref(), Some("abc"));
/// assert_eq!(env.reads(), vec!["HAULER_TOKEN".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingEnv {
    vars: HashMap<String, String>,
    reads: Mutex<Vec<String>>,
}

impl RecordingEnv {
    /// Creates an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a variable.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Returns the number of reads.
    pub fn calls(&self) -> usize {
        self.reads.lock().len()
    }

    /// Returns the variable names read, in order.
    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().clone()
    }
}

impl EnvSource for RecordingEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.reads.lock().push(name.to_owned());
        self.vars.get(name).cloned()
    }
}

#[derive(Debug, Clone)]
enum StoreBehavior {
    Empty,
    Secret(String),
    Fail(String),
}

/// A [`SecretStore`] double that records `(service, account)` lookups.
#[derive(Debug)]
pub struct RecordingSecretStore {
    behavior: StoreBehavior,
    lookups: Mutex<Vec<(String, String)>>,
}

impl RecordingSecretStore {
    fn with_behavior(behavior: StoreBehavior) -> Self {
        Self {
            behavior,
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// A store with no entries.
    pub fn empty() -> Self {
        Self::with_behavior(StoreBehavior::Empty)
    }

    /// A store that returns `secret` for every lookup.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self::with_behavior(StoreBehavior::Secret(secret.into()))
    }

    /// A store that fails every lookup with a `CredentialBackend` error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(StoreBehavior::Fail(message.into()))
    }

    /// Returns the number of lookups.
    pub fn calls(&self) -> usize {
        self.lookups.lock().len()
    }

    /// Returns the `(service, account)` pairs looked up, in order.
    pub fn lookups(&self) -> Vec<(String, String)> {
        self.lookups.lock().clone()
    }
}

impl SecretStore for RecordingSecretStore {
    fn get(&self, service: &str, account: &str) -> Result<Option<String>> {
        self.lookups
            .lock()
            .push((service.to_owned(), account.to_owned()));
        match &self.behavior {
            StoreBehavior::Empty => Ok(None),
            StoreBehavior::Secret(secret) => Ok(Some(secret.clone())),
            StoreBehavior::Fail(message) => Err(Error::credential_backend(message.clone())),
        }
    }
}

/// A [`ConfigSource`] double that records the account keys it is asked for.
#[derive(Debug)]
pub struct RecordingConfigSource {
    behavior: StoreBehavior,
    accounts: Mutex<Vec<String>>,
}

impl RecordingConfigSource {
    fn with_behavior(behavior: StoreBehavior) -> Self {
        Self {
            behavior,
            accounts: Mutex::new(Vec::new()),
        }
    }

    /// A config with no token (or no file at all).
    pub fn empty() -> Self {
        Self::with_behavior(StoreBehavior::Empty)
    }

    /// A config holding `token` for every account.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self::with_behavior(StoreBehavior::Secret(token.into()))
    }

    /// A config that fails with a `CredentialBackend` error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(StoreBehavior::Fail(message.into()))
    }

    /// Returns the number of lookups.
    pub fn calls(&self) -> usize {
        self.accounts.lock().len()
    }

    /// Returns the account keys looked up, in order.
    pub fn accounts(&self) -> Vec<String> {
        self.accounts.lock().clone()
    }
}

impl ConfigSource for RecordingConfigSource {
    fn token_for(&self, account: &str) -> Result<Option<String>> {
        self.accounts.lock().push(account.to_owned());
        match &self.behavior {
            StoreBehavior::Empty => Ok(None),
            StoreBehavior::Secret(token) => Ok(Some(token.clone())),
            StoreBehavior::Fail(message) => Err(Error::credential_backend(message.clone())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_recording_env_counts_reads() {
        let env = RecordingEnv::new().with("A", "1");
        assert_eq!(env.var("A").as_deref(), Some("1"));
        assert!(env.var("B").is_none());
        assert_eq!(env.calls(), 2);
        assert_eq!(env.reads(), vec!["A".to_owned(), "B".to_owned()]);
    }

    #[test]
    fn test_recording_store_behaviors() {
        assert_eq!(RecordingSecretStore::empty().get("s", "a").unwrap(), None);
        assert_eq!(
            RecordingSecretStore::with_secret("x").get("s", "a").unwrap().as_deref(),
            Some("x")
        );
        let failing = RecordingSecretStore::failing("locked");
        let err = failing.get("s", "a").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialBackend);
        assert_eq!(failing.lookups(), vec![("s".to_owned(), "a".to_owned())]);
    }

    #[test]
    fn test_recording_config_behaviors() {
        let config = RecordingConfigSource::with_token("t");
        assert_eq!(config.token_for("acct").unwrap().as_deref(), Some("t"));
        assert_eq!(config.accounts(), vec!["acct".to_owned()]);
        assert!(RecordingConfigSource::failing("bad").token_for("acct").is_err());
    }
}
