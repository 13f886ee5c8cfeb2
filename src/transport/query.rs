//! JSON:API query parameters.

use url::Url;

/// Ordered JSON:API query parameters.
///
/// Parameters are appended in call order. Blank filters and sorts, empty
/// field and include lists, and non-positive page values are skipped, so a
/// command can pass its flags through without checking each one.
///
/// ## Example
///
/// ```rust
/// use hauler::Query;
///
/// let query = Query::new()
///     .fields("brokers", ["company-name", "is-active"])
///     .include(["broker"])
///     .filter("status", "active")
///     .filter("q", "  ")
///     .page(Some(50), Some(0))
///     .sort("-created-at");
///
/// assert_eq!(
///     query.to_query_string(),
///     "fields%5Bbrokers%5D=company-name%2Cis-active&include=broker&filter%5Bstatus%5D=active&page%5Blimit%5D=50&sort=-created-at"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `fields[<resource_type>]`.
    #[must_use]
    pub fn fields<I, S>(mut self, resource_type: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(joined) = join_non_blank(fields) {
            self.params
                .push((format!("fields[{}]", resource_type), joined));
        }
        self
    }

    /// Adds `include`.
    #[must_use]
    pub fn include<I, S>(mut self, relationships: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(joined) = join_non_blank(relationships) {
            self.params.push(("include".to_owned(), joined));
        }
        self
    }

    /// Adds `filter[<name>]` unless `value` is blank.
    #[must_use]
    pub fn filter(mut self, name: &str, value: &str) -> Self {
        let value = value.trim();
        if !value.is_empty() {
            self.params
                .push((format!("filter[{}]", name), value.to_owned()));
        }
        self
    }

    /// Adds `page[limit]` and `page[offset]` for positive values.
    #[must_use]
    pub fn page(mut self, limit: Option<u32>, offset: Option<u32>) -> Self {
        if let Some(limit) = limit.filter(|l| *l > 0) {
            self.params
                .push(("page[limit]".to_owned(), limit.to_string()));
        }
        if let Some(offset) = offset.filter(|o| *o > 0) {
            self.params
                .push(("page[offset]".to_owned(), offset.to_string()));
        }
        self
    }

    /// Adds `sort` unless blank.
    #[must_use]
    pub fn sort(mut self, sort: &str) -> Self {
        let sort = sort.trim();
        if !sort.is_empty() {
            self.params.push(("sort".to_owned(), sort.to_owned()));
        }
        self
    }

    /// Returns the parameters in order.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Returns the value of the first parameter named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns `true` if no parameter was added.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Appends the parameters to a URL's query string.
    pub fn apply_to(&self, url: &mut Url) {
        if self.params.is_empty() {
            return;
        }
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &self.params {
            pairs.append_pair(key, value);
        }
    }

    /// Renders the form-encoded query string.
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn join_non_blank<I, S>(items: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items: Vec<String> = items
        .into_iter()
        .map(|s| s.as_ref().trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect();
    (!items.is_empty()).then(|| items.join(","))
}

/// User overrides for the primary sparse fieldset and the include list.
///
/// An override that is *set* replaces the command's default, even when it is
/// empty: `--fields ""` asks for no primary fieldset at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseFieldOverrides {
    primary: Option<Vec<String>>,
    include: Option<Vec<String>>,
}

impl SparseFieldOverrides {
    /// Builds overrides from comma-separated flag values.
    pub fn from_flags(fields: Option<&str>, include: Option<&str>) -> Self {
        Self {
            primary: fields.map(split_list),
            include: include.map(split_list),
        }
    }

    /// Returns `true` if the primary fieldset was overridden.
    pub fn fields_set(&self) -> bool {
        self.primary.is_some()
    }

    /// Returns `true` if the include list was overridden.
    pub fn include_set(&self) -> bool {
        self.include.is_some()
    }

    /// Returns the effective primary fieldset.
    pub fn primary_or<'a>(&'a self, default: &'a [&'a str]) -> Vec<&'a str> {
        match &self.primary {
            Some(fields) => fields.iter().map(String::as_str).collect(),
            None => default.to_vec(),
        }
    }

    /// Returns the effective include list.
    pub fn include_or<'a>(&'a self, default: &'a [&'a str]) -> Vec<&'a str> {
        match &self.include {
            Some(include) => include.iter().map(String::as_str).collect(),
            None => default.to_vec(),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
