//! Transport layer.
//!
//! - [`RestTransport`]: JSON:API `GET` over reqwest with retries and status
//!   mapping
//! - [`Query`]: ordered `fields`/`include`/`filter`/`page`/`sort` parameters
//! - [`SparseFieldOverrides`]: user overrides for the primary fieldset and
//!   include list
//!
//! Most callers go through [`ApiClient`](crate::ApiClient), which pairs the
//! transport with a credential and parses responses into
//! [`Document`](crate::Document)s.

mod query;
mod rest;

pub use query::{Query, SparseFieldOverrides};
pub use rest::{JSON_API, RestTransport, RestTransportBuilder};
