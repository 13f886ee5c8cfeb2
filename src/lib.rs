//! # hauler
//!
//! Client library and command line for JSON:API resource servers.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hauler::prelude::*;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), hauler::Error> {
//!     let config = ClientConfig::builder()
//!         .base_url("https://app.hauler.example")
//!         .build();
//!
//!     // explicit token, then HAULER_TOKEN / HAULER_API_TOKEN, then the OS
//!     // keychain, then ~/.config/hauler/config.json
//!     let credential = CredentialResolver::system(config.base_url()).resolve(None)?;
//!     let client = ApiClient::new(&config, Some(credential))?;
//!
//!     let query = Query::new()
//!         .fields("broker-commitments", ["status", "buyer"])
//!         .include(["buyer"]);
//!     let doc = client.fetch_collection("/v1/broker-commitments", &query).await?;
//!
//!     let projector = Projector::new()
//!         .field("ID", field::id())
//!         .field("Status", field::string("status"))
//!         .field("Buyer", field::related_or_id("buyer", &["company-name"]));
//!     for row in projector.project_document(&doc) {
//!         println!("{} {} {}", row.text("ID"), row.text("Status"), row.text("Buyer"));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **Best-effort attributes**: [`Attributes`] accessors return the zero
//!   value for missing, `null` and mismatched values alike
//! - **Relationships**: [`RelationshipSlot`] is `None`, `ToOne` or `ToMany`;
//!   shapes that are none of these decode as `None`
//! - **Hydration**: the [`IncludedIndex`] resolves identifiers against the
//!   response's `included` array and never fetches
//! - **Sparse echo**: [`document::sparse::echo`] prints exactly what the
//!   server sent
//!
//! ## Features
//!
//! - `rustls` (default): Use rustls for TLS
//! - `native-tls`: Use native TLS (OpenSSL on Linux, Secure Transport on macOS)

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod auth;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod project;

// Transport layer
pub mod transport;

// Command line
pub mod cli;

// Testing utilities
pub mod testing;

// Prelude for convenient imports
pub mod prelude;

mod user_agent;

// Re-export main types at crate root for convenience
pub use client::ApiClient;
pub use document::{
    AttributeValue, Attributes, Document, Identifier, IncludedIndex, PrimaryData,
    RelationshipSlot, Resource,
};
pub use error::{Error, ErrorKind, Result};
pub use project::{Projector, Row};

// Re-export auth types
pub use auth::{ConfigSource, Credential, CredentialResolver, EnvSource, Provenance, SecretStore};

// Re-export config types
pub use config::{ClientConfig, RetryConfig};

// Re-export transport types
pub use transport::{Query, SparseFieldOverrides};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_reexports() {
        let _ = ErrorKind::CredentialNotFound;
        let _ = Provenance::ConfigFile;
        assert!(Query::new().is_empty());
    }
}
