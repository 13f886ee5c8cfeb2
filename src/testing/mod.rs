//! Testing utilities.
//!
//! Recording doubles for the credential sources. Each one counts and records
//! its invocations so tests can assert which resolution tiers ran:
//!
//! - [`RecordingEnv`]: an in-memory environment
//! - [`RecordingSecretStore`]: an OS credential store that is empty, holds a
//!   secret, or fails
//! - [`RecordingConfigSource`]: a config file that is empty, holds a token, or
//!   is malformed
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use hauler::{CredentialResolver, ErrorKind};
//! use hauler::testing::{RecordingConfigSource, RecordingEnv, RecordingSecretStore};
//!
//! let store = Arc::new(RecordingSecretStore::failing("keychain locked"));
//! let config = Arc::new(RecordingConfigSource::with_token("stale"));
//! let resolver = CredentialResolver::new(
//!     "https://app.example.com",
//!     Arc::new(RecordingEnv::new()),
//!     store.clone(),
//!     config.clone(),
//! );
//!
//! let err = resolver.resolve(None).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::CredentialBackend);
//! assert_eq!(config.calls(), 0);
//! ```

mod sources;

pub use sources::{RecordingConfigSource, RecordingEnv, RecordingSecretStore};
