//! Accessor combinators for [`Projector`](super::Projector) columns.
//!
//! Every combinator returns a [`Field`]. Attribute reads follow the
//! best-effort policy of [`Attributes`](crate::Attributes): missing, `null`
//! and mismatched values produce the same blank cell.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::Projection;
use crate::document::{AttributeValue, Resource};

type AccessorFn = dyn Fn(&Projection<'_>) -> Value + Send + Sync;

/// A column accessor.
#[derive(Clone)]
pub struct Field(Arc<AccessorFn>);

impl Field {
    /// Wraps a closure as an accessor.
    pub fn new<F>(accessor: F) -> Self
    where
        F: Fn(&Projection<'_>) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(accessor))
    }

    /// Evaluates the accessor.
    #[inline]
    pub fn get(&self, projection: &Projection<'_>) -> Value {
        (self.0)(projection)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Field(..)")
    }
}

/// Returns `true` for cells a fallback chain should skip: `null`, blank
/// strings and empty lists.
pub fn is_empty_cell(cell: &Value) -> bool {
    match cell {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Returns the first value that is not blank, trimmed, or `""`.
pub fn first_non_empty_str<'a>(values: impl IntoIterator<Item = &'a str>) -> &'a str {
    values
        .into_iter()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or("")
}

/// The primary resource's id.
pub fn id() -> Field {
    Field::new(|p| Value::String(p.resource().id().to_owned()))
}

/// The primary resource's type.
pub fn resource_type() -> Field {
    Field::new(|p| Value::String(p.resource().resource_type().to_owned()))
}

/// A string attribute, `""` when absent.
pub fn string(key: &'static str) -> Field {
    Field::new(move |p| Value::String(p.resource().attributes().string(key)))
}

/// A boolean attribute, `false` when absent.
pub fn boolean(key: &'static str) -> Field {
    Field::new(move |p| Value::Bool(p.resource().attributes().bool(key)))
}

/// A numeric attribute exactly as sent, `null` when absent or not a number.
pub fn number(key: &'static str) -> Field {
    Field::new(move |p| match p.resource().attributes().get(key) {
        Some(value @ AttributeValue::Number(_)) => value.to_json(),
        _ => Value::Null,
    })
}

/// A string-list attribute, `[]` when absent.
pub fn string_list(key: &'static str) -> Field {
    Field::new(move |p| {
        Value::Array(
            p.resource()
                .attributes()
                .string_list(key)
                .into_iter()
                .map(Value::String)
                .collect(),
        )
    })
}

/// A timestamp attribute rendered as `YYYY-MM-DD HH:MM` UTC.
///
/// Values that are not RFC 3339 pass through unchanged.
pub fn timestamp(key: &'static str) -> Field {
    Field::new(move |p| {
        let raw = p.resource().attributes().trimmed(key);
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(parsed) => Value::String(
                parsed
                    .with_timezone(&Utc)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            ),
            Err(_) => Value::String(raw),
        }
    })
}

/// The id of a to-one relationship, `""` when empty.
pub fn relationship_id(relationship: &'static str) -> Field {
    Field::new(move |p| {
        let slot = p.resource().relationship(relationship);
        Value::String(slot.identifier().map(|i| i.id().to_owned()).unwrap_or_default())
    })
}

/// The type of a to-one relationship, `""` when empty.
pub fn relationship_type(relationship: &'static str) -> Field {
    Field::new(move |p| {
        let slot = p.resource().relationship(relationship);
        Value::String(
            slot.identifier()
                .map(|i| i.resource_type().to_owned())
                .unwrap_or_default(),
        )
    })
}

/// The ids of any relationship, in wire order.
pub fn relationship_ids(relationship: &'static str) -> Field {
    Field::new(move |p| {
        let slot = p.resource().relationship(relationship);
        Value::Array(
            slot.ids()
                .into_iter()
                .map(|id| Value::String(id.to_owned()))
                .collect(),
        )
    })
}

/// Hydrates a to-one relationship and reads the first non-blank of `keys`.
///
/// `""` when the relationship is empty, was not included, or every key is
/// blank.
pub fn related_string(relationship: &'static str, keys: &'static [&'static str]) -> Field {
    Field::new(move |p| Value::String(related_text(p.related(relationship), keys)))
}

/// Like [`related_string`], falling back to the bare related id.
pub fn related_or_id(relationship: &'static str, keys: &'static [&'static str]) -> Field {
    Field::new(move |p| {
        let name = related_text(p.related(relationship), keys);
        if !name.is_empty() {
            return Value::String(name);
        }
        let slot = p.resource().relationship(relationship);
        Value::String(slot.identifier().map(|i| i.id().to_owned()).unwrap_or_default())
    })
}

/// A polymorphic to-one relationship rendered as `type<separator>id`.
pub fn polymorphic(relationship: &'static str, separator: &'static str) -> Field {
    Field::new(move |p| {
        let slot = p.resource().relationship(relationship);
        Value::String(
            slot.identifier()
                .map(|i| i.joined(separator))
                .unwrap_or_default(),
        )
    })
}

/// The first accessor whose cell is not empty (see [`is_empty_cell`]).
///
/// Returns the last accessor's cell, or `null`, when all are empty.
pub fn first_non_empty(accessors: Vec<Field>) -> Field {
    Field::new(move |p| {
        let mut last = Value::Null;
        for accessor in &accessors {
            let cell = accessor.get(p);
            if !is_empty_cell(&cell) {
                return cell;
            }
            last = cell;
        }
        last
    })
}

/// An arbitrary accessor.
pub fn custom<F>(accessor: F) -> Field
where
    F: Fn(&Projection<'_>) -> Value + Send + Sync + 'static,
{
    Field::new(accessor)
}

fn related_text(related: Option<&Resource>, keys: &[&str]) -> String {
    let Some(resource) = related else {
        return String::new();
    };
    let attributes = resource.attributes();
    let values: Vec<String> = keys.iter().map(|key| attributes.string(key)).collect();
    first_non_empty_str(values.iter().map(String::as_str)).to_owned()
}
