//! Resolved credentials.

use std::fmt;

use zeroize::Zeroizing;

/// Where a resolved token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Supplied directly by the caller (`--token`).
    Explicit,

    /// Read from an environment variable.
    Env,

    /// Read from the operating system's credential store.
    Keychain,

    /// Read from the config file.
    ConfigFile,
}

impl Provenance {
    /// Returns a short stable label for logs and status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Explicit => "explicit",
            Provenance::Env => "env",
            Provenance::Keychain => "keychain",
            Provenance::ConfigFile => "config-file",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bearer token together with its provenance.
///
/// The token buffer is zeroized on drop and never appears in `Debug` output.
///
/// ## Example
///
/// ```rust
/// use hauler::{Credential, Provenance};
///
/// let credential = Credential::new("secret_token", Provenance::Env);
/// assert_eq!(credential.token(), "secret_token");
///
/// let debug = format!("{:?}", credential);
/// assert!(!debug.contains("secret_token"));
/// assert!(debug.contains("REDACTED"));
/// ```
#[derive(Clone)]
pub struct Credential {
    token: Zeroizing<String>,
    provenance: Provenance,
}

impl Credential {
    /// Creates a credential.
    pub fn new(token: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            token: Zeroizing::new(token.into()),
            provenance,
        }
    }

    /// Returns the bearer token.
    #[inline]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns where the token came from.
    #[inline]
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.token.as_str() == other.token.as_str() && self.provenance == other.provenance
    }
}

impl Eq for Credential {}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"[REDACTED]")
            .field("provenance", &self.provenance)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_accessors() {
        let credential = Credential::new("test_token", Provenance::Keychain);
        assert_eq!(credential.token(), "test_token");
        assert_eq!(credential.provenance(), Provenance::Keychain);
    }

    #[test]
    fn test_credential_debug_redacts_token() {
        let credential = Credential::new("secret_token", Provenance::Explicit);
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("secret_token"));
        assert!(debug.contains("REDACTED"));
        assert!(debug.contains("Explicit"));
    }

    #[test]
    fn test_credential_clone() {
        let credential = Credential::new("test_token", Provenance::Env);
        let cloned = credential.clone();
        assert_eq!(cloned, credential);
    }

    #[test]
    fn test_provenance_labels() {
        assert_eq!(Provenance::Explicit.to_string(), "explicit");
        assert_eq!(Provenance::Env.to_string(), "env");
        assert_eq!(Provenance::Keychain.to_string(), "keychain");
        assert_eq!(Provenance::ConfigFile.to_string(), "config-file");
    }
}
