//! Per-request search parameters.

use std::collections::BTreeSet;

use crate::error::CatalogError;
use crate::package::Version;

/// Filters of one catalog search.
///
/// `kibana_version` is kept as the caller wrote it; it is parsed when the
/// filter pipeline is compiled so that a bad value rejects the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub kibana_version: Option<String>,
    pub category: Option<String>,
    pub package_name: Option<String>,
    /// Return every matching version instead of the newest per name.
    pub all: bool,
    /// Include packages flagged as internal.
    pub internal: bool,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kibana_version(mut self, version: impl Into<String>) -> Self {
        self.kibana_version = Some(version.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }

    pub fn all(mut self, all: bool) -> Self {
        self.all = all;
        self
    }

    pub fn internal(mut self, internal: bool) -> Self {
        self.internal = internal;
        self
    }

    /// Parsed platform version, if one was requested.
    pub fn parsed_kibana_version(&self) -> Result<Option<Version>, CatalogError> {
        self.kibana_version.as_deref().map(Version::parse).transpose()
    }

    /// Decode URL-style parameters (`kibana`, `category`, `package`, `all`,
    /// `internal`).
    ///
    /// Empty values and unknown keys are ignored. When a key repeats, its
    /// first non-empty value wins. A boolean that cannot be parsed counts as
    /// `false`; a bad `kibana` version is an error.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Query::new();
        let mut seen = BTreeSet::new();

        for (key, value) in pairs {
            let value = value.as_ref();
            if value.is_empty() || !seen.insert(key.as_ref().to_string()) {
                continue;
            }
            match key.as_ref() {
                "kibana" => {
                    Version::parse(value)?;
                    query.kibana_version = Some(value.to_string());
                }
                "category" => query.category = Some(value.to_string()),
                "package" => query.package_name = Some(value.to_string()),
                "all" => query.all = parse_bool(value),
                "internal" => query.internal = parse_bool(value),
                _ => {}
            }
        }

        Ok(query)
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "t" | "T" | "true" | "TRUE" | "True")
}
