//! JSON:API document model.
//!
//! A response body is parsed once into a [`Document`]: the primary data (one
//! resource or a collection), plus an [`IncludedIndex`] built from the
//! `included` array before anything reads relationships.
//!
//! ## Example
//!
//! ```rust
//! use hauler::Document;
//!
//! let body = br#"{
//!     "data": {
//!         "id": "1",
//!         "type": "broker-commitments",
//!         "attributes": {"status": "active"},
//!         "relationships": {"buyer": {"data": {"type": "brokers", "id": "5"}}}
//!     },
//!     "included": [
//!         {"id": "5", "type": "brokers", "attributes": {"company-name": "Acme"}}
//!     ]
//! }"#;
//!
//! let doc = Document::parse_single(body).unwrap();
//! let commitment = &doc.resources()[0];
//! let buyer = doc.included().hydrate(&commitment.relationship("buyer"));
//! assert_eq!(buyer.map(|b| b.attributes().string("company-name")), Some("Acme".into()));
//! ```

mod included;
mod relationship;
mod resource;
pub mod sparse;
mod value;

use serde::Deserialize;
use serde_json::Value;

pub use included::IncludedIndex;
pub use relationship::RelationshipSlot;
pub use resource::{Identifier, RawRelationship, Resource};
pub use value::{AttributeValue, Attributes};

use crate::error::{Error, Result};

/// The primary data of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryData {
    /// `data` held a single resource object.
    Single(Resource),

    /// `data` held an array of resource objects.
    Collection(Vec<Resource>),
}

/// The document shape a caller expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Any,
    Single,
    Collection,
}

#[derive(Deserialize)]
struct WireDocument {
    #[serde(default)]
    data: Value,

    #[serde(default, deserialize_with = "value::null_as_default")]
    included: Vec<Resource>,

    #[serde(default)]
    meta: Option<Value>,

    #[serde(default)]
    links: Option<Value>,
}

/// A parsed JSON:API document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    data: PrimaryData,
    included: IncludedIndex,
    meta: Option<Value>,
    links: Option<Value>,
}

impl Document {
    /// Creates a single-resource document.
    pub fn single(resource: Resource, included: Vec<Resource>) -> Self {
        Self {
            data: PrimaryData::Single(resource),
            included: IncludedIndex::build(included),
            meta: None,
            links: None,
        }
    }

    /// Creates a collection document.
    pub fn collection(resources: Vec<Resource>, included: Vec<Resource>) -> Self {
        Self {
            data: PrimaryData::Collection(resources),
            included: IncludedIndex::build(included),
            meta: None,
            links: None,
        }
    }

    /// Parses a body whose `data` may be an object or an array.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MalformedResponse`](crate::ErrorKind::MalformedResponse)
    /// carrying the raw body when the bytes are not a JSON:API document.
    pub fn parse(body: &[u8]) -> Result<Self> {
        Self::parse_as(body, Expect::Any)
    }

    /// Parses a body whose `data` must be a single resource object.
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` when `data` is missing, `null`, or an array.
    pub fn parse_single(body: &[u8]) -> Result<Self> {
        Self::parse_as(body, Expect::Single)
    }

    /// Parses a body whose `data` must be an array of resource objects.
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` when `data` is not an array.
    pub fn parse_collection(body: &[u8]) -> Result<Self> {
        Self::parse_as(body, Expect::Collection)
    }

    fn parse_as(body: &[u8], expect: Expect) -> Result<Self> {
        let wire: WireDocument = serde_json::from_slice(body).map_err(|e| {
            Error::malformed_response(format!("invalid JSON:API document: {}", e), body)
                .with_source(e)
        })?;

        let data = match (wire.data, expect) {
            (Value::Array(items), Expect::Any | Expect::Collection) => {
                PrimaryData::Collection(decode_resources(items, body)?)
            }
            (object @ Value::Object(_), Expect::Any | Expect::Single) => {
                PrimaryData::Single(decode_resource(object, body)?)
            }
            (Value::Null, _) => {
                return Err(Error::malformed_response("document has no primary data", body));
            }
            (Value::Array(_), Expect::Single) => {
                return Err(Error::malformed_response(
                    "expected a single resource, got an array",
                    body,
                ));
            }
            (Value::Object(_), Expect::Collection) => {
                return Err(Error::malformed_response(
                    "expected a collection, got a single resource",
                    body,
                ));
            }
            (_, _) => {
                return Err(Error::malformed_response(
                    "primary data is neither an object nor an array",
                    body,
                ));
            }
        };

        let included = IncludedIndex::build(wire.included);
        let document = Self {
            data,
            included,
            meta: wire.meta,
            links: wire.links,
        };
        tracing::debug!(
            resources = document.resources().len(),
            included = document.included.len(),
            "parsed document"
        );
        Ok(document)
    }

    /// Returns the primary data.
    #[inline]
    pub fn data(&self) -> &PrimaryData {
        &self.data
    }

    /// Returns `true` if the primary data was a single resource.
    pub fn is_single(&self) -> bool {
        matches!(self.data, PrimaryData::Single(_))
    }

    /// Returns the primary resources: one for a single document, all of them
    /// in wire order for a collection.
    pub fn resources(&self) -> &[Resource] {
        match &self.data {
            PrimaryData::Single(resource) => std::slice::from_ref(resource),
            PrimaryData::Collection(resources) => resources,
        }
    }

    /// Returns the index over `included`.
    #[inline]
    pub fn included(&self) -> &IncludedIndex {
        &self.included
    }

    /// Returns the top-level `meta` member, untouched.
    pub fn meta(&self) -> Option<&Value> {
        self.meta.as_ref()
    }

    /// Returns the top-level `links` member, untouched.
    pub fn links(&self) -> Option<&Value> {
        self.links.as_ref()
    }
}

fn decode_resource(value: Value, body: &[u8]) -> Result<Resource> {
    serde_json::from_value(value).map_err(|e| {
        Error::malformed_response(format!("invalid resource object: {}", e), body).with_source(e)
    })
}

fn decode_resources(items: Vec<Value>, body: &[u8]) -> Result<Vec<Resource>> {
    items
        .into_iter()
        .map(|item| decode_resource(item, body))
        .collect()
}
