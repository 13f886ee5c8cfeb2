//! Resource descriptors and the static registry.

use std::fmt;

use crate::error::{Error, Result};
use crate::project::Projector;
use crate::transport::{Query, SparseFieldOverrides};

use super::resources;

/// Paging and sorting for a `list` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// `filter[<name>]` pairs, in flag order.
    pub filters: Vec<(String, String)>,
    /// `page[limit]`.
    pub limit: Option<u32>,
    /// `page[offset]`.
    pub offset: Option<u32>,
    /// `sort`.
    pub sort: Option<String>,
}

/// Everything the CLI needs to list and show one resource.
#[derive(Clone, bon::Builder)]
pub struct ResourceDescriptor {
    /// Command-line name, e.g. `broker-commitments`.
    name: &'static str,

    /// One-line description for `view resources`.
    #[builder(default)]
    summary: &'static str,

    /// Collection path, e.g. `/v1/broker-commitments`.
    path: &'static str,

    /// JSON:API type of the primary resource.
    resource_type: &'static str,

    /// Default primary fieldset for `list`.
    #[builder(default)]
    list_fields: &'static [&'static str],

    /// Default primary fieldset for `show`. Empty means every field.
    #[builder(default)]
    show_fields: &'static [&'static str],

    /// Default `include` for `list`.
    #[builder(default)]
    list_include: &'static [&'static str],

    /// Default `include` for `show`.
    #[builder(default)]
    show_include: &'static [&'static str],

    /// Fieldsets requested for included types.
    #[builder(default)]
    related_fields: &'static [(&'static str, &'static [&'static str])],

    /// Accepted `--filter` names.
    #[builder(default)]
    filters: &'static [&'static str],

    /// Table and JSON columns for `list`.
    list: Projector,

    /// `Label: value` lines for `show`.
    detail: Projector,
}

impl ResourceDescriptor {
    /// Returns the command-line name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the one-line description.
    pub fn summary(&self) -> &'static str {
        self.summary
    }

    /// Returns the collection path.
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the JSON:API type.
    pub fn resource_type(&self) -> &'static str {
        self.resource_type
    }

    /// Returns the accepted filter names.
    pub fn filters(&self) -> &'static [&'static str] {
        self.filters
    }

    /// Returns the `list` projector.
    pub fn list_projector(&self) -> &Projector {
        &self.list
    }

    /// Returns the `show` projector.
    pub fn detail_projector(&self) -> &Projector {
        &self.detail
    }

    /// Message printed for an empty `list` table.
    pub fn empty_message(&self) -> String {
        format!("No {} found.", self.name.replace('-', " "))
    }

    /// Path of one resource. The id is percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error for a blank id.
    pub fn member_path(&self, id: &str) -> Result<String> {
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::validation(format!("{} id is required", self.name)));
        }
        Ok(format!("{}/{}", self.path, urlencoding::encode(id)))
    }

    /// Builds the query for `list`.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error for a filter this resource does not
    /// accept.
    pub fn list_query(
        &self,
        overrides: &SparseFieldOverrides,
        options: &ListOptions,
    ) -> Result<Query> {
        if let Some((name, _)) = options
            .filters
            .iter()
            .find(|(name, _)| !self.filters.contains(&name.as_str()))
        {
            return Err(Error::validation(format!(
                "unknown filter '{}' for {} (accepted: {})",
                name,
                self.name,
                self.accepted_filters()
            )));
        }

        let mut query = self.sparse_query(overrides, self.list_fields, self.list_include);
        for (name, value) in &options.filters {
            query = query.filter(name, value);
        }
        Ok(query
            .page(options.limit, options.offset)
            .sort(options.sort.as_deref().unwrap_or_default()))
    }

    /// Builds the query for `show`.
    pub fn show_query(&self, overrides: &SparseFieldOverrides) -> Query {
        self.sparse_query(overrides, self.show_fields, self.show_include)
    }

    fn sparse_query(
        &self,
        overrides: &SparseFieldOverrides,
        fields: &'static [&'static str],
        include: &'static [&'static str],
    ) -> Query {
        let include = overrides.include_or(include);
        let mut query = Query::new()
            .fields(self.resource_type, overrides.primary_or(fields))
            .include(include.iter().copied());
        for (resource_type, fields) in self.related_fields {
            query = query.fields(resource_type, fields.iter().copied());
        }
        query
    }

    fn accepted_filters(&self) -> String {
        if self.filters.is_empty() {
            "none".to_owned()
        } else {
            self.filters.join(", ")
        }
    }
}

impl fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("resource_type", &self.resource_type)
            .finish_non_exhaustive()
    }
}

/// The resources the CLI knows about, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    descriptors: Vec<ResourceDescriptor>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the registry of built-in resources.
    pub fn builtin() -> Self {
        resources::all()
            .into_iter()
            .fold(Self::new(), Self::register)
    }

    /// Adds a descriptor, replacing one with the same name.
    #[must_use]
    pub fn register(mut self, descriptor: ResourceDescriptor) -> Self {
        self.descriptors.retain(|d| d.name != descriptor.name);
        self.descriptors.push(descriptor);
        self
    }

    /// Looks up a resource by name.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error for an unknown name.
    pub fn get(&self, name: &str) -> Result<&ResourceDescriptor> {
        let name = name.trim();
        self.descriptors
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| {
                Error::validation(format!(
                    "unknown resource '{}' (run `hauler view resources`)",
                    name
                ))
            })
    }

    /// Returns the descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.descriptors.iter()
    }

    /// Returns the number of descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if no descriptor is registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
