//! JSON:API resource objects.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::relationship::RelationshipSlot;
use super::value::{Attributes, null_as_default};

/// A `(type, id)` pair identifying a resource.
///
/// Identifiers borrow from the document they were decoded from; they are
/// views, not owned copies.
///
/// # Example
///
/// ```rust
/// use hauler::Identifier;
///
/// let id = Identifier::new("brokers", "5");
/// assert_eq!(id.to_string(), "brokers/5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier<'a> {
    resource_type: &'a str,
    id: &'a str,
}

impl<'a> Identifier<'a> {
    /// Creates an identifier.
    pub fn new(resource_type: &'a str, id: &'a str) -> Self {
        Self { resource_type, id }
    }

    /// Returns the resource type.
    #[inline]
    pub fn resource_type(&self) -> &'a str {
        self.resource_type
    }

    /// Returns the resource id.
    #[inline]
    pub fn id(&self) -> &'a str {
        self.id
    }

    /// Renders as `type<separator>id`, e.g. `projects|42`.
    pub fn joined(&self, separator: &str) -> String {
        format!("{}{}{}", self.resource_type, separator, self.id)
    }

    /// Converts to the JSON shape used on the wire.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "type": self.resource_type, "id": self.id })
    }
}

impl fmt::Display for Identifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.id)
    }
}

/// The raw value of one relationship entry.
///
/// Only `data` is interpreted. It is kept undecoded because the same key may
/// hold `null`, an object, or an array; see [`RelationshipSlot::decode`].
/// An entry that is not an object at all parses as one with no members.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawRelationship {
    data: serde_json::Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    links: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<serde_json::Value>,
}

impl<'de> Deserialize<'de> for RawRelationship {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let serde_json::Value::Object(mut entry) = serde_json::Value::deserialize(deserializer)?
        else {
            return Ok(Self::default());
        };
        let mut member = |key: &str| entry.remove(key).filter(|value| !value.is_null());
        Ok(Self {
            links: member("links"),
            meta: member("meta"),
            data: member("data").unwrap_or_default(),
        })
    }
}

impl RawRelationship {
    /// Creates a raw relationship from its `data` member.
    pub fn from_data(data: serde_json::Value) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Returns the undecoded `data` member (`Null` when absent).
    #[inline]
    pub fn data(&self) -> &serde_json::Value {
        &self.data
    }

    /// Returns the `links` member, if the server sent one.
    pub fn links(&self) -> Option<&serde_json::Value> {
        self.links.as_ref()
    }

    /// Decodes the `data` member. See [`RelationshipSlot::decode`].
    pub fn decode(&self) -> RelationshipSlot<'_> {
        RelationshipSlot::decode(&self.data)
    }
}

/// A JSON:API resource object.
///
/// Resources are immutable once parsed: all accessors borrow.
///
/// # Example
///
/// ```rust
/// use hauler::Resource;
///
/// let resource: Resource = serde_json::from_str(r#"{
///     "id": "1",
///     "type": "broker-commitments",
///     "attributes": {"status": "active"},
///     "relationships": {"buyer": {"data": {"type": "brokers", "id": "5"}}}
/// }"#).unwrap();
///
/// assert_eq!(resource.attributes().string("status"), "active");
/// let buyer = resource.relationship("buyer");
/// assert_eq!(buyer.identifier().map(|i| i.id()), Some("5"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default, deserialize_with = "null_as_default")]
    id: String,

    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    resource_type: String,

    #[serde(default, deserialize_with = "null_as_default")]
    attributes: Attributes,

    #[serde(default, deserialize_with = "null_as_default")]
    relationships: BTreeMap<String, RawRelationship>,
}

impl Resource {
    /// Creates a resource with no attributes or relationships.
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
            ..Self::default()
        }
    }

    /// Replaces the attribute bag.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Adds a relationship from its raw `data` member.
    #[must_use]
    pub fn with_relationship(mut self, name: impl Into<String>, data: serde_json::Value) -> Self {
        self.relationships
            .insert(name.into(), RawRelationship::from_data(data));
        self
    }

    /// Returns the resource id.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the resource type.
    #[inline]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Returns this resource's own identifier.
    pub fn identifier(&self) -> Identifier<'_> {
        Identifier::new(&self.resource_type, &self.id)
    }

    /// Returns the attribute bag.
    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the raw relationship entries in key order.
    pub fn relationships(&self) -> &BTreeMap<String, RawRelationship> {
        &self.relationships
    }

    /// Resolves a relationship by name.
    ///
    /// A missing relationship, a `null` one, and one whose shape is not
    /// recognized all resolve to [`RelationshipSlot::None`].
    pub fn relationship(&self, name: &str) -> RelationshipSlot<'_> {
        self.relationships
            .get(name)
            .map(RawRelationship::decode)
            .unwrap_or(RelationshipSlot::None)
    }
}
