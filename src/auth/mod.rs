//! Credential resolution.
//!
//! - [`Credential`]: a bearer token with its [`Provenance`]
//! - [`CredentialResolver`]: the ordered explicit → env → keychain →
//!   config-file chain
//! - [`EnvSource`], [`SecretStore`], [`ConfigSource`]: the injectable sources
//!   behind the tiers
//!
//! Tokens never reach logs: [`Credential`]'s `Debug` output is redacted and
//! the resolver only records provenance.
//!
//! ```rust,ignore
//! use hauler::{CredentialResolver, ErrorKind};
//!
//! let resolver = CredentialResolver::system("https://app.hauler.example");
//! match resolver.resolve(None) {
//!     Ok(credential) => println!("using token from {}", credential.provenance()),
//!     Err(e) if e.kind() == ErrorKind::CredentialNotFound => println!("not logged in"),
//!     Err(e) => return Err(e),
//! }
//! ```

mod credentials;
mod keychain;
mod provider;
mod resolver;

pub use credentials::{Credential, Provenance};
pub use keychain::{KEYCHAIN_SERVICE, KeyringStore, account_key};
pub use provider::{ConfigSource, EnvSource, SecretStore, SystemEnv};
pub use resolver::{CredentialResolver, TOKEN_ENV, TOKEN_ENV_ALIAS};
