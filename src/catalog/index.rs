//! In-memory index of every known package version.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::error::CatalogError;
use crate::package::{Package, Version};

/// Package name -> version -> package.
///
/// Built in one go from the loader output and never mutated afterwards;
/// a refresh builds a new index instead.
#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    packages: BTreeMap<String, BTreeMap<Version, Package>>,
}

impl PackageIndex {
    /// Build an index, failing on two packages with the same name and version.
    pub fn build<I>(packages: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Package>,
    {
        let mut index = BTreeMap::<String, BTreeMap<Version, Package>>::new();

        for package in packages {
            let versions = index.entry(package.name.clone()).or_default();
            match versions.entry(package.version.clone()) {
                Entry::Occupied(_) => {
                    return Err(CatalogError::DuplicateVersion {
                        name: package.name,
                        version: package.version.to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(package);
                }
            }
        }

        Ok(Self { packages: index })
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Number of distinct package names.
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Number of name/version pairs.
    pub fn version_count(&self) -> usize {
        self.packages.values().map(|v| v.len()).sum()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// All versions of a package, oldest first.
    pub fn versions(&self, name: &str) -> impl Iterator<Item = &Package> {
        self.packages.get(name).into_iter().flat_map(|v| v.values())
    }

    pub fn get(&self, name: &str, version: &Version) -> Option<&Package> {
        self.packages.get(name)?.get(version)
    }

    pub fn latest(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)?.values().next_back()
    }

    /// Every package, ordered by name then version.
    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.values().flat_map(|v| v.values())
    }
}
