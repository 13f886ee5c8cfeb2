//! Error types for the client.
//!
//! A single [`Error`] type carries an [`ErrorKind`] category. The library
//! returns typed outcomes and never prints or exits; the command layer maps
//! kinds to messages and exit codes.
//!
//! ## Key Distinction
//!
//! [`ErrorKind::CredentialNotFound`] is expected (the user has not logged in
//! yet) while [`ErrorKind::CredentialBackend`] means a broken environment:
//!
//! ```rust,ignore
//! match resolver.resolve(explicit) {
//!     Ok(credential) => Some(credential),
//!     Err(e) if e.kind() == ErrorKind::CredentialNotFound => None,
//!     Err(e) => return Err(e),
//! }
//! ```

mod core;
mod kind;

pub use self::core::Error;
pub use kind::ErrorKind;

/// A specialized `Result` type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
