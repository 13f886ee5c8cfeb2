//! The on-disk config file.
//!
//! Location: `$XDG_CONFIG_HOME/hauler/config.json`, falling back to
//! `~/.config/hauler/config.json`. Shape:
//!
//! ```json
//! {
//!   "base_url": "https://app.hauler.example",
//!   "token": "default-token",
//!   "tokens": { "https://app.hauler.example": "per-url-token" }
//! }
//! ```
//!
//! Every member is optional.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::auth::{ConfigSource, EnvSource, SystemEnv, account_key};
use crate::error::{Error, Result};

const APP_DIR: &str = "hauler";
const FILE_NAME: &str = "config.json";

/// Parsed contents of the config file.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    tokens: BTreeMap<String, String>,
}

impl ConfigFile {
    /// Returns the default config file path, or `None` when no home
    /// directory can be determined.
    pub fn default_path(env: &dyn EnvSource) -> Option<PathBuf> {
        let base = env
            .var("XDG_CONFIG_HOME")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".config"))
            })?;
        Some(base.join(APP_DIR).join(FILE_NAME))
    }

    /// Loads the file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns a `CredentialBackend` error when the file exists but cannot be
    /// read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file");
                return Ok(None);
            }
            Err(e) => {
                return Err(Error::credential_backend(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                ))
                .with_source(e));
            }
        };

        if contents.trim().is_empty() {
            return Ok(Some(Self::default()));
        }

        serde_json::from_str(&contents).map(Some).map_err(|e| {
            Error::credential_backend(format!("{} is not valid JSON: {}", path.display(), e))
                .with_source(e)
        })
    }

    /// Returns the configured base URL, if any.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Returns the token for an account key.
    ///
    /// The per-URL map is checked first (keys are normalized with
    /// [`account_key`]), then the default `token`.
    pub fn token_for(&self, account: &str) -> Option<&str> {
        self.tokens
            .iter()
            .find(|(key, _)| account_key(key) == account)
            .map(|(_, token)| token.as_str())
            .filter(|token| !token.trim().is_empty())
            .or(self.token.as_deref())
            .filter(|token| !token.trim().is_empty())
    }
}

impl fmt::Debug for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFile")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("tokens", &self.tokens.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// [`ConfigSource`] that reads the config file on every lookup.
#[derive(Debug, Clone, Default)]
pub struct ConfigFileSource {
    path: Option<PathBuf>,
}

impl ConfigFileSource {
    /// Reads from an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Reads from the default location.
    pub fn system() -> Self {
        Self {
            path: ConfigFile::default_path(&SystemEnv),
        }
    }

    /// Returns the path this source reads, if one could be determined.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Loads the whole file.
    ///
    /// # Errors
    ///
    /// See [`ConfigFile::load`].
    pub fn load(&self) -> Result<Option<ConfigFile>> {
        match &self.path {
            Some(path) => ConfigFile::load(path),
            None => Ok(None),
        }
    }
}

impl ConfigSource for ConfigFileSource {
    fn token_for(&self, account: &str) -> Result<Option<String>> {
        Ok(self
            .load()?
            .and_then(|file| file.token_for(account).map(|t| t.trim().to_owned())))
    }
}
