//! Manifest loader: turns a package tree into validated [`Package`] records.
//!
//! A broken package never aborts the whole load. Each failure is logged and
//! reported next to the packages that did load.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

use super::dataset::Dataset;
use super::discovery::{find_all_packages, find_datasets, list_pipeline_files};
use super::manifest::Package;

/// A package that could not be loaded, with the reason.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: anyhow::Error,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub packages: Vec<Package>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Source of every package known to the catalog.
#[cfg_attr(test, mockall::automock)]
pub trait ManifestLoader: Send + Sync {
    fn load_all(&self) -> Result<LoadReport>;
}

/// Loads packages from `<root>/<name>/<version>/` directories.
pub struct FsManifestLoader<R: Runtime> {
    runtime: R,
    root: PathBuf,
}

impl<R: Runtime> FsManifestLoader<R> {
    pub fn new(runtime: R, root: PathBuf) -> Self {
        Self { runtime, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load one package and validate all of its datasets.
    #[tracing::instrument(skip(self))]
    pub fn load_package(&self, manifest_path: &Path) -> Result<Package> {
        let package_dir = manifest_path
            .parent()
            .with_context(|| format!("Manifest {:?} has no parent directory", manifest_path))?;

        let content = self.runtime.read_to_string(manifest_path)?;
        let mut package = Package::from_manifest(&content, package_dir)?;

        for dataset_manifest in find_datasets(&self.runtime, package_dir)? {
            let dataset = self
                .load_dataset(&package.name, &dataset_manifest)
                .with_context(|| {
                    format!(
                        "Invalid dataset {:?} in package {}",
                        dataset_manifest, package.key()
                    )
                })?;
            package.datasets.push(dataset);
        }

        debug!(
            "Loaded {} with {} dataset(s)",
            package.key(),
            package.datasets.len()
        );
        Ok(package)
    }

    fn load_dataset(&self, package_name: &str, manifest_path: &Path) -> Result<Dataset> {
        let dataset_dir = manifest_path
            .parent()
            .with_context(|| format!("Manifest {:?} has no parent directory", manifest_path))?;

        let content = self.runtime.read_to_string(manifest_path)?;
        let mut dataset = Dataset::from_manifest(&content, package_name, dataset_dir)?;
        let pipeline_files = list_pipeline_files(&self.runtime, &dataset.pipeline_dir())?;
        dataset.validate(&pipeline_files)?;
        Ok(dataset)
    }
}

impl<R: Runtime> ManifestLoader for FsManifestLoader<R> {
    #[tracing::instrument(skip(self), fields(root = ?self.root))]
    fn load_all(&self) -> Result<LoadReport> {
        let scan = find_all_packages(&self.runtime, &self.root)
            .with_context(|| format!("Failed to scan package tree {:?}", self.root))?;

        debug!("Found {} package manifest(s)", scan.manifests.len());

        let mut report = LoadReport {
            packages: Vec::new(),
            failures: scan.unreadable,
        };
        for manifest_path in scan.manifests {
            match self.load_package(&manifest_path) {
                Ok(package) => report.packages.push(package),
                Err(error) => {
                    warn!("Skipping package {:?}: {:#}", manifest_path, error);
                    report.failures.push(LoadFailure {
                        path: manifest_path,
                        error,
                    });
                }
            }
        }

        Ok(report)
    }
}
