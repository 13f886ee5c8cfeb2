//! Row projection.
//!
//! A [`Projector`] is an ordered list of `(column, accessor)` pairs. Each
//! accessor sees one primary resource together with the document's
//! [`IncludedIndex`] and returns a JSON cell; the projector collects the cells
//! into a [`Row`]. Projection only reads; resources are never mutated.
//!
//! Accessors are built from the combinators in [`field`].
//!
//! ## Example
//!
//! ```rust
//! use hauler::Document;
//! use hauler::project::{Projector, field};
//!
//! let doc = Document::parse(br#"{
//!     "data": [{"id": "1", "type": "broker-commitments",
//!               "attributes": {"status": "active"},
//!               "relationships": {"buyer": {"data": {"type": "brokers", "id": "5"}}}}],
//!     "included": [{"id": "5", "type": "brokers", "attributes": {"company-name": "Acme"}}]
//! }"#).unwrap();
//!
//! let projector = Projector::new()
//!     .field("ID", field::id())
//!     .field("Status", field::string("status"))
//!     .field("BuyerName", field::related_string("buyer", &["company-name"]));
//!
//! let rows = projector.project_document(&doc);
//! assert_eq!(rows[0].text("BuyerName"), "Acme");
//! ```

pub mod field;

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

pub use field::Field;

use crate::document::{Document, IncludedIndex, Resource};

/// What an accessor sees: one primary resource and the included index.
#[derive(Debug, Clone, Copy)]
pub struct Projection<'a> {
    resource: &'a Resource,
    included: &'a IncludedIndex,
}

impl<'a> Projection<'a> {
    /// Creates a projection context.
    pub fn new(resource: &'a Resource, included: &'a IncludedIndex) -> Self {
        Self { resource, included }
    }

    /// Returns the primary resource.
    #[inline]
    pub fn resource(&self) -> &'a Resource {
        self.resource
    }

    /// Returns the included index.
    #[inline]
    pub fn included(&self) -> &'a IncludedIndex {
        self.included
    }

    /// Hydrates a to-one relationship of the primary resource.
    pub fn related(&self, relationship: &str) -> Option<&'a Resource> {
        self.included
            .hydrate(&self.resource.relationship(relationship))
    }
}

/// One projected row: ordered `(column, cell)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a cell.
    pub fn push(&mut self, column: impl Into<String>, cell: Value) {
        self.cells.push((column.into(), cell));
    }

    /// Returns the cell for a column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cell)| cell)
    }

    /// Returns a cell rendered as plain text, or `""` for a missing column.
    pub fn text(&self, column: &str) -> String {
        self.get(column).map(cell_text).unwrap_or_default()
    }

    /// Returns the column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the cells in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(name, cell)| (name.as_str(), cell))
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns a copy without `null` and empty-string cells.
    #[must_use]
    pub fn without_empty(&self) -> Self {
        Self {
            cells: self
                .cells
                .iter()
                .filter(|(_, cell)| !matches!(cell, Value::Null) && cell.as_str() != Some(""))
                .cloned()
                .collect(),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, cell) in &self.cells {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

/// Renders a cell as table text.
///
/// `null` is blank, booleans are `yes`/`no`, lists are comma-joined.
pub fn cell_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::Bool(true) => "yes".to_owned(),
        Value::Bool(false) => "no".to_owned(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => cell.to_string(),
    }
}

/// An ordered list of columns and the accessors that fill them.
#[derive(Clone, Default)]
pub struct Projector {
    columns: Vec<(String, Field)>,
}

impl Projector {
    /// Creates a projector with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column.
    #[must_use]
    pub fn field(mut self, column: impl Into<String>, accessor: Field) -> Self {
        self.columns.push((column.into(), accessor));
        self
    }

    /// Returns the column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Projects one resource.
    pub fn project(&self, resource: &Resource, included: &IncludedIndex) -> Row {
        let projection = Projection::new(resource, included);
        let mut row = Row::new();
        for (column, accessor) in &self.columns {
            row.push(column.clone(), accessor.get(&projection));
        }
        row
    }

    /// Projects every primary resource of a document, in wire order.
    pub fn project_document(&self, document: &Document) -> Vec<Row> {
        document
            .resources()
            .iter()
            .map(|resource| self.project(resource, document.included()))
            .collect()
    }
}

impl fmt::Debug for Projector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projector")
            .field("columns", &self.columns().collect::<Vec<_>>())
            .finish()
    }
}
