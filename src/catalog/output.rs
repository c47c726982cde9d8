//! Ordering and projection of search results.

use serde::Serialize;

use crate::package::{Icon, Package};

/// Public view of one package in a search result.
///
/// Fields are declared in key order so the JSON document is stable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageSummary {
    pub description: String,
    pub download: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icons: Option<Vec<Icon>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub internal: bool,
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub package_type: String,
    pub version: String,
}

impl From<&Package> for PackageSummary {
    fn from(p: &Package) -> Self {
        PackageSummary {
            description: p.description.clone(),
            download: p.download_path(),
            icons: p.icons.clone(),
            internal: p.internal,
            name: p.name.clone(),
            path: p.catalog_path(),
            title: p.title.clone(),
            package_type: p.package_type.clone(),
            version: p.version.to_string(),
        }
    }
}

pub type ResultSet = Vec<PackageSummary>;

/// Sort by the `name@version` key and project every package.
pub fn format(selected: Vec<&Package>) -> ResultSet {
    let mut keyed: Vec<(String, &Package)> = selected.into_iter().map(|p| (p.key(), p)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, p)| PackageSummary::from(p)).collect()
}

/// Render a result set as a two-space indented JSON array.
pub fn to_json(results: &[PackageSummary]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}
