//! Package data model
//!
//! This module provides the records the catalog is built from: packages,
//! their datasets and streams, semantic versions, and the loader that reads
//! them from a package tree.

mod dataset;
mod discovery;
mod loader;
mod manifest;
mod version;

pub use dataset::{Dataset, Stream, VarDefinition, VarValue};
pub use discovery::{MANIFEST_FILE, PackageScan, find_all_packages, find_datasets, list_pipeline_files};
pub use loader::{FsManifestLoader, LoadFailure, LoadReport, ManifestLoader};
pub use manifest::{Icon, NAME_SEPARATOR, Package, ProductRequirement, Requirement, validate_name};
pub use version::{Version, VersionConstraint, compare, is_newer};

#[cfg(test)]
pub use loader::MockManifestLoader;
