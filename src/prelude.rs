//! Prelude module for convenient imports.
//!
//! ```rust
//! use hauler::prelude::*;
//! ```
//!
//! This provides access to:
//! - The API client and its configuration
//! - Error types
//! - Credential resolution
//! - The document model and row projection

pub use crate::{
    auth::{Credential, CredentialResolver, Provenance},
    client::ApiClient,
    config::{ClientConfig, RetryConfig},
    document::{
        AttributeValue, Attributes, Document, Identifier, IncludedIndex, PrimaryData,
        RelationshipSlot, Resource,
    },
    error::{Error, ErrorKind, Result},
    project::{Projector, Row, field},
    transport::{Query, SparseFieldOverrides},
};
