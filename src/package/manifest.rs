use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::dataset::Dataset;
use super::version::{Version, VersionConstraint};
use crate::error::CatalogError;

/// Separator of the `name@version` composite key; never valid inside a name.
pub const NAME_SEPARATOR: char = '@';

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Icon {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ProductRequirement {
    #[serde(default)]
    pub versions: VersionConstraint,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Requirement {
    #[serde(default)]
    pub kibana: ProductRequirement,
    #[serde(default)]
    pub elasticsearch: ProductRequirement,
}

/// One package at one version, as described by its `manifest.yml`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Package {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub version: Version,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub package_type: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub requirement: Requirement,
    #[serde(default)]
    pub internal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<Vec<Icon>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub release: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format_version: String,

    #[serde(skip)]
    pub datasets: Vec<Dataset>,
    #[serde(skip)]
    pub base_path: PathBuf,
}

impl Package {
    pub fn new(name: &str, version: Version) -> Self {
        Package {
            name: name.to_string(),
            title: None,
            version,
            description: String::new(),
            package_type: String::new(),
            categories: Vec::new(),
            requirement: Requirement::default(),
            internal: false,
            icons: None,
            release: String::new(),
            format_version: String::new(),
            datasets: Vec::new(),
            base_path: PathBuf::new(),
        }
    }

    /// Parse a package manifest. Datasets are attached later by the loader.
    pub fn from_manifest(content: &str, base_path: &Path) -> Result<Self> {
        let mut package: Package = serde_yaml_ng::from_str(content)
            .with_context(|| format!("Failed to parse package manifest in {:?}", base_path))?;
        validate_name(&package.name)?;
        package.base_path = base_path.to_path_buf();
        Ok(package)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn kibana_constraint(&self) -> &VersionConstraint {
        &self.requirement.kibana.versions
    }

    /// A package without a Kibana requirement is compatible with every version.
    pub fn has_kibana_version(&self, version: &Version) -> bool {
        self.kibana_constraint().matches(version)
    }

    pub fn is_newer(&self, other: &Package) -> bool {
        super::version::is_newer(&self.version, &other.version)
    }

    /// Returns: `/epr/<name>/<name>-<version>.tar.gz`
    pub fn download_path(&self) -> String {
        format!("/epr/{}/{}-{}.tar.gz", self.name, self.name, self.version)
    }

    /// Returns: `/package/<name>/<version>`
    pub fn catalog_path(&self) -> String {
        format!("/package/{}/{}", self.name, self.version)
    }

    /// Returns: `<name>@<version>`
    pub fn key(&self) -> String {
        format!("{}{}{}", self.name, NAME_SEPARATOR, self.version)
    }
}

pub fn validate_name(name: &str) -> Result<(), CatalogError> {
    if name.trim().is_empty() || name.contains(NAME_SEPARATOR) {
        return Err(CatalogError::InvalidPackageName(name.to_string()));
    }
    Ok(())
}
