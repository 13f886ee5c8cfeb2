//! OS credential store access and account keys.

use url::Url;

use super::provider::SecretStore;
use crate::error::{Error, Result};

/// Service name under which tokens are stored in the OS credential store.
pub const KEYCHAIN_SERVICE: &str = "hauler";

/// [`SecretStore`] backed by the platform credential store via `keyring`
/// (macOS Keychain, Windows Credential Manager, Linux keyutils / Secret
/// Service).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringStore;

impl SecretStore for KeyringStore {
    fn get(&self, service: &str, account: &str) -> Result<Option<String>> {
        let entry = keyring::Entry::new(service, account).map_err(backend_error)?;
        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(backend_error(e)),
        }
    }
}

fn backend_error(err: keyring::Error) -> Error {
    Error::credential_backend(format!("keychain lookup failed: {}", err)).with_source(err)
}

/// Derives the account key under which a base URL's token is stored.
///
/// Scheme and host are lowercased, a non-default port is kept, and path,
/// query, fragment and trailing slashes are dropped. Input that does not
/// parse as a URL is used trimmed, without trailing slashes.
///
/// ```rust
/// use hauler::auth::account_key;
///
/// assert_eq!(account_key("https://App.Example.com/v1/"), "https://app.example.com");
/// assert_eq!(account_key("http://localhost:3000"), "http://localhost:3000");
/// assert_eq!(account_key("  not a url/ "), "not a url");
/// ```
pub fn account_key(base_url: &str) -> String {
    let trimmed = base_url.trim();
    match Url::parse(trimmed) {
        Ok(url) if url.has_host() => {
            let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
            match url.port() {
                Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
                None => format!("{}://{}", url.scheme(), host),
            }
        }
        _ => trimmed.trim_end_matches('/').to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("https://App.Example.com/v1/", "https://app.example.com" ; "path and case")]
    #[test_case("https://app.example.com", "https://app.example.com" ; "already normal")]
    #[test_case("https://app.example.com/", "https://app.example.com" ; "trailing slash")]
    #[test_case("HTTPS://app.example.com:443", "https://app.example.com" ; "default port dropped")]
    #[test_case("http://localhost:3000/api?x=1#f", "http://localhost:3000" ; "custom port kept")]
    #[test_case(" https://app.example.com ", "https://app.example.com" ; "whitespace")]
    #[test_case("app.example.com//", "app.example.com" ; "not a url")]
    fn test_account_key(input: &str, expected: &str) {
        assert_eq!(account_key(input), expected);
    }
}
