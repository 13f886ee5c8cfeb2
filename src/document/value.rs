//! Attribute values and the best-effort accessor family.
//!
//! Resource attributes arrive as an untyped JSON object whose shape evolves
//! with the server. [`AttributeValue`] gives every wire value an explicit tag;
//! [`Attributes`] wraps the bag and exposes lookups for the shapes a display
//! tool asks for.
//!
//! ## Best-effort policy
//!
//! The accessors [`Attributes::string`], [`Attributes::bool`],
//! [`Attributes::float`], [`Attributes::int`] and [`Attributes::string_list`]
//! never fail. They return the requested type's zero value (`""`, `false`,
//! `0.0`, `0`, empty list) in exactly three cases:
//!
//! 1. the key is missing,
//! 2. the value is JSON `null`,
//! 3. the value's wire type is not the requested type.
//!
//! All three cases are indistinguishable to the caller. This hides schema
//! drift: a renamed or retyped server field renders as blank rather than
//! failing the command. Callers that need to tell "absent" from "zero" use the
//! `opt_*` variants, which return `None` in the same three cases.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A single attribute value as it appeared on the wire.
///
/// Numbers keep their exact wire representation so that integers echo back
/// as integers.
///
/// # Example
///
/// ```rust
/// use hauler::AttributeValue;
///
/// let value: AttributeValue = serde_json::from_str("[\"a\", \"b\"]").unwrap();
/// assert_eq!(value.as_string_list(), Some(vec!["a", "b"]));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// JSON `null`.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Numeric value, integer or floating point.
    Number(serde_json::Number),

    /// String value.
    String(String),

    /// Array of values.
    List(Vec<AttributeValue>),

    /// Nested object.
    Object(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Returns `true` if this is a null value.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Returns the boolean value if this is a Bool variant.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the numeric value as `f64` if this is a Number variant.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Returns the numeric value as `i64`, truncating any fraction toward zero.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            _ => None,
        }
    }

    /// Returns the string value if this is a String variant.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements if this is a List whose every element is a string.
    pub fn as_string_list(&self) -> Option<Vec<&str>> {
        match self {
            AttributeValue::List(items) => items.iter().map(AttributeValue::as_str).collect(),
            _ => None,
        }
    }

    /// Returns the list if this is a List variant.
    #[inline]
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the object if this is an Object variant.
    #[inline]
    pub fn as_object(&self) -> Option<&BTreeMap<String, AttributeValue>> {
        match self {
            AttributeValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Converts to a plain JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            AttributeValue::Null => serde_json::Value::Null,
            AttributeValue::Bool(b) => serde_json::Value::Bool(*b),
            AttributeValue::Number(n) => serde_json::Value::Number(n.clone()),
            AttributeValue::String(s) => serde_json::Value::String(s.clone()),
            AttributeValue::List(items) => {
                serde_json::Value::Array(items.iter().map(AttributeValue::to_json).collect())
            }
            AttributeValue::Object(obj) => serde_json::Value::Object(
                obj.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Number(value.into())
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(AttributeValue::Null, AttributeValue::Number)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl<T: Into<AttributeValue>> From<Vec<T>> for AttributeValue {
    fn from(value: Vec<T>) -> Self {
        AttributeValue::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttributeValue::Null, Into::into)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => Ok(()),
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Number(n) => write!(f, "{}", n),
            AttributeValue::String(s) => f.write_str(s),
            AttributeValue::List(items) => {
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                Ok(())
            }
            AttributeValue::Object(_) => write!(f, "{}", self.to_json()),
        }
    }
}

/// The attribute bag of a resource.
///
/// Keys are kept in sorted order so every rendering is deterministic.
///
/// # Example
///
/// ```rust
/// use hauler::Attributes;
///
/// let attrs = Attributes::new()
///     .with("status", "active")
///     .with("is-admin", true)
///     .with("weight", 12.5);
///
/// assert_eq!(attrs.string("status"), "active");
/// assert!(attrs.bool("is-admin"));
/// assert_eq!(attrs.float("weight"), 12.5);
///
/// // Missing, null and mismatched values all read as the zero value.
/// assert_eq!(attrs.string("missing"), "");
/// assert_eq!(attrs.string("weight"), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    values: BTreeMap<String, AttributeValue>,
}

impl Attributes {
    /// Creates an empty attribute bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key-value pair.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Gets the raw value by key.
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.values.get(key)
    }

    /// Returns `true` if the bag contains the key, even when its value is null.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns `true` if the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns an iterator over the attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.values.iter()
    }

    // Best-effort accessors

    /// String value, or `""`.
    pub fn string(&self, key: &str) -> String {
        self.opt_string(key).unwrap_or_default()
    }

    /// String value with surrounding whitespace removed, or `""`.
    pub fn trimmed(&self, key: &str) -> String {
        self.get(key)
            .and_then(AttributeValue::as_str)
            .map(|s| s.trim().to_owned())
            .unwrap_or_default()
    }

    /// Boolean value, or `false`.
    pub fn bool(&self, key: &str) -> bool {
        self.opt_bool(key).unwrap_or_default()
    }

    /// Numeric value, or `0.0`.
    pub fn float(&self, key: &str) -> f64 {
        self.opt_float(key).unwrap_or_default()
    }

    /// Numeric value truncated toward zero, or `0`.
    pub fn int(&self, key: &str) -> i64 {
        self.opt_int(key).unwrap_or_default()
    }

    /// List of strings, or an empty list.
    ///
    /// A list holding any non-string element is a type mismatch.
    pub fn string_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(AttributeValue::as_string_list)
            .map(|items| items.into_iter().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    // Optional accessors

    /// String value, or `None` when missing, null, or not a string.
    pub fn opt_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(AttributeValue::as_str).map(str::to_owned)
    }

    /// Boolean value, or `None` when missing, null, or not a boolean.
    pub fn opt_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(AttributeValue::as_bool)
    }

    /// Numeric value, or `None` when missing, null, or not a number.
    pub fn opt_float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(AttributeValue::as_f64)
    }

    /// Integer value, or `None` when missing, null, or not a number.
    pub fn opt_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(AttributeValue::as_i64)
    }
}

impl FromIterator<(String, AttributeValue)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (String, AttributeValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a AttributeValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Deserializes a field whose JSON `null` means "use the default".
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
