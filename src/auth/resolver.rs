//! The four-tier credential resolution chain.

use std::fmt;
use std::sync::Arc;

use super::credentials::{Credential, Provenance};
use super::keychain::{KEYCHAIN_SERVICE, KeyringStore, account_key};
use super::provider::{ConfigSource, EnvSource, SecretStore, SystemEnv};
use crate::config::ConfigFileSource;
use crate::error::{Error, Result};

/// Primary environment variable holding a bearer token.
pub const TOKEN_ENV: &str = "HAULER_TOKEN";

/// Alias checked when [`TOKEN_ENV`] is unset or blank.
pub const TOKEN_ENV_ALIAS: &str = "HAULER_API_TOKEN";

/// Resolves the bearer token for one base URL.
///
/// ## Resolution order
///
/// 1. **explicit**: a non-blank token passed to [`resolve`](Self::resolve)
/// 2. **env**: `HAULER_TOKEN`, then `HAULER_API_TOKEN`
/// 3. **keychain**: the OS credential store, service `hauler`, account
///    [`account_key`] of the base URL
/// 4. **config-file**: the config file's token for the same account key
///
/// The first tier that yields a non-blank value wins and later tiers are not
/// consulted. Values are trimmed; blank values defer to the next tier.
///
/// ## Failures
///
/// | Outcome                              | Result                      |
/// |--------------------------------------|-----------------------------|
/// | every tier deferred                  | `CredentialNotFound`        |
/// | keychain failed (not just empty)     | `CredentialBackend`, stop   |
/// | config file unreadable or malformed  | `CredentialBackend`         |
///
/// A keychain failure stops resolution: the config file is never read after
/// a broken keychain, so a stale file token cannot mask the real problem.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use hauler::{CredentialResolver, Provenance};
/// use hauler::testing::{RecordingConfigSource, RecordingEnv, RecordingSecretStore};
///
/// let env = Arc::new(RecordingEnv::new());
/// let store = Arc::new(RecordingSecretStore::empty());
/// let config = Arc::new(RecordingConfigSource::empty());
///
/// let resolver = CredentialResolver::new(
///     "https://app.example.com",
///     env.clone(),
///     store.clone(),
///     config.clone(),
/// );
///
/// let credential = resolver.resolve(Some("tok")).unwrap();
/// assert_eq!(credential.provenance(), Provenance::Explicit);
/// assert_eq!(env.calls(), 0);
/// assert_eq!(store.calls(), 0);
/// assert_eq!(config.calls(), 0);
/// ```
#[derive(Clone)]
pub struct CredentialResolver {
    account: String,
    env: Arc<dyn EnvSource>,
    secrets: Arc<dyn SecretStore>,
    config: Arc<dyn ConfigSource>,
}

impl CredentialResolver {
    /// Creates a resolver over the given sources.
    pub fn new(
        base_url: &str,
        env: Arc<dyn EnvSource>,
        secrets: Arc<dyn SecretStore>,
        config: Arc<dyn ConfigSource>,
    ) -> Self {
        Self {
            account: account_key(base_url),
            env,
            secrets,
            config,
        }
    }

    /// Creates a resolver over the process environment, the OS credential
    /// store, and the config file at its default location.
    pub fn system(base_url: &str) -> Self {
        Self::new(
            base_url,
            Arc::new(SystemEnv),
            Arc::new(KeyringStore),
            Arc::new(ConfigFileSource::system()),
        )
    }

    /// Returns the account key derived from the base URL.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Runs the chain.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::CredentialNotFound`](crate::ErrorKind::CredentialNotFound)
    ///   when every tier deferred
    /// - [`ErrorKind::CredentialBackend`](crate::ErrorKind::CredentialBackend)
    ///   when the keychain or the config file failed
    pub fn resolve(&self, explicit: Option<&str>) -> Result<Credential> {
        if let Some(token) = explicit.and_then(non_blank) {
            return Ok(self.found(token, Provenance::Explicit));
        }

        for name in [TOKEN_ENV, TOKEN_ENV_ALIAS] {
            if let Some(token) = self.env.var(name).as_deref().and_then(non_blank) {
                tracing::debug!(variable = name, "token found in environment");
                return Ok(self.found(token, Provenance::Env));
            }
        }

        let stored = self
            .secrets
            .get(KEYCHAIN_SERVICE, &self.account)
            .inspect_err(|e| tracing::warn!(error = %e, "keychain lookup failed"))?;
        if let Some(token) = stored.as_deref().and_then(non_blank) {
            return Ok(self.found(token, Provenance::Keychain));
        }

        let configured = self.config.token_for(&self.account)?;
        if let Some(token) = configured.as_deref().and_then(non_blank) {
            return Ok(self.found(token, Provenance::ConfigFile));
        }

        tracing::debug!(account = %self.account, "no token in any source");
        Err(Error::credential_not_found(format!(
            "no API token found for {}",
            self.account
        )))
    }

    fn found(&self, token: &str, provenance: Provenance) -> Credential {
        tracing::info!(provenance = %provenance, account = %self.account, "resolved credential");
        Credential::new(token, provenance)
    }
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
