//! Relationship decoding.
//!
//! On the wire a relationship's `data` member is ambiguous: the same key can
//! hold `null`, a single resource identifier object, or an array of them.
//! [`RelationshipSlot::decode`] turns that into an explicit union.
//!
//! ## Decode order
//!
//! 1. JSON `null` (or an absent `data` member) → [`RelationshipSlot::None`]
//! 2. an array of `{type, id}` objects → [`RelationshipSlot::ToMany`]
//! 3. a single `{type, id}` object → [`RelationshipSlot::ToOne`]
//! 4. anything else → [`RelationshipSlot::None`]
//!
//! Step 4 is deliberate: an unrecognized shape degrades to absence rather than
//! failing the whole response, so new server-side relationship shapes never
//! break existing commands. The array attempt comes first; an identifier
//! object can never also decode as an array, but the order is fixed all the
//! same.

use serde_json::Value;

use super::resource::Identifier;

/// A decoded relationship.
///
/// Borrows from the resource it was resolved on; decoding the same raw value
/// twice yields identical identifiers.
///
/// # Example
///
/// ```rust
/// use hauler::RelationshipSlot;
/// use serde_json::json;
///
/// let raw = json!([{"type": "t", "id": "1"}, {"type": "t", "id": "2"}]);
/// let slot = RelationshipSlot::decode(&raw);
/// assert_eq!(slot.count(), 2);
///
/// let raw = json!({"type": "t", "id": "1"});
/// let slot = RelationshipSlot::decode(&raw);
/// assert_eq!(slot.identifier().map(|i| i.id()), Some("1"));
///
/// assert!(RelationshipSlot::decode(&json!(null)).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RelationshipSlot<'a> {
    /// No related resource, or an unrecognized shape.
    #[default]
    None,

    /// A to-one relationship.
    ToOne(Identifier<'a>),

    /// A to-many relationship (possibly empty).
    ToMany(Vec<Identifier<'a>>),
}

impl<'a> RelationshipSlot<'a> {
    /// Decodes a raw `data` member.
    pub fn decode(raw: &'a Value) -> Self {
        if raw.is_null() {
            return RelationshipSlot::None;
        }
        if let Some(identifiers) = decode_many(raw) {
            return RelationshipSlot::ToMany(identifiers);
        }
        if let Some(identifier) = decode_one(raw) {
            return RelationshipSlot::ToOne(identifier);
        }
        tracing::trace!("unrecognized relationship shape; treating as empty");
        RelationshipSlot::None
    }

    /// Returns `true` if there is no related resource.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, RelationshipSlot::None)
    }

    /// Returns `true` for a to-many relationship.
    #[inline]
    pub fn is_to_many(&self) -> bool {
        matches!(self, RelationshipSlot::ToMany(_))
    }

    /// Returns the identifier of a to-one relationship.
    ///
    /// `None` for empty and to-many relationships.
    pub fn identifier(&self) -> Option<Identifier<'a>> {
        match self {
            RelationshipSlot::ToOne(identifier) => Some(*identifier),
            _ => None,
        }
    }

    /// Returns every identifier: none, exactly one, or the to-many list.
    pub fn identifiers(&self) -> &[Identifier<'a>] {
        match self {
            RelationshipSlot::None => &[],
            RelationshipSlot::ToOne(identifier) => std::slice::from_ref(identifier),
            RelationshipSlot::ToMany(identifiers) => identifiers,
        }
    }

    /// Returns the number of related identifiers.
    pub fn count(&self) -> usize {
        self.identifiers().len()
    }

    /// Returns the related ids in wire order.
    pub fn ids(&self) -> Vec<&'a str> {
        self.identifiers().iter().map(Identifier::id).collect()
    }

    /// Converts back to the identifier JSON shape.
    pub fn to_json(&self) -> Value {
        match self {
            RelationshipSlot::None => Value::Null,
            RelationshipSlot::ToOne(identifier) => identifier.to_json(),
            RelationshipSlot::ToMany(identifiers) => {
                Value::Array(identifiers.iter().map(Identifier::to_json).collect())
            }
        }
    }
}

fn decode_many(raw: &Value) -> Option<Vec<Identifier<'_>>> {
    raw.as_array()?.iter().map(decode_one).collect()
}

fn decode_one(raw: &Value) -> Option<Identifier<'_>> {
    let object = raw.as_object()?;
    let resource_type = object.get("type")?.as_str()?;
    let id = object.get("id")?.as_str()?;
    Some(Identifier::new(resource_type, id))
}
