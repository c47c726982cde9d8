use anyhow::{Context, Result};
use log::warn;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

use super::loader::LoadFailure;

pub const MANIFEST_FILE: &str = "manifest.yml";

/// Manifests found in a package tree, plus package directories that could
/// not be listed.
#[derive(Debug, Default)]
pub struct PackageScan {
    pub manifests: Vec<PathBuf>,
    pub unreadable: Vec<LoadFailure>,
}

/// Find all package manifests by scanning the package tree
///
/// Directory structure: `<root>/<name>/<version>/manifest.yml`
///
/// Only an unreadable root is an error. A package directory that cannot be
/// listed is recorded in [`PackageScan::unreadable`] and the scan goes on.
#[tracing::instrument(skip(runtime, root))]
pub fn find_all_packages<R: Runtime>(runtime: &R, root: &Path) -> Result<PackageScan> {
    let mut scan = PackageScan::default();

    if !runtime.exists(root) {
        return Ok(scan);
    }

    for name_path in runtime.read_dir(root)? {
        if !runtime.is_dir(&name_path) {
            continue;
        }

        let version_paths = match runtime
            .read_dir(&name_path)
            .with_context(|| format!("Failed to list package directory {:?}", name_path))
        {
            Ok(paths) => paths,
            Err(error) => {
                warn!("Skipping package directory {:?}: {:#}", name_path, error);
                scan.unreadable.push(LoadFailure {
                    path: name_path,
                    error,
                });
                continue;
            }
        };

        for version_path in version_paths {
            if runtime.is_dir(&version_path) {
                let manifest_path = version_path.join(MANIFEST_FILE);
                if runtime.exists(&manifest_path) {
                    scan.manifests.push(manifest_path);
                }
            }
        }
    }

    Ok(scan)
}

/// Find the dataset manifests of one package
///
/// Directory structure: `<package>/dataset/<dataset>/manifest.yml`
#[tracing::instrument(skip(runtime, package_dir))]
pub fn find_datasets<R: Runtime>(runtime: &R, package_dir: &Path) -> Result<Vec<PathBuf>> {
    let dataset_root = package_dir.join("dataset");
    let mut manifests = Vec::new();

    if !runtime.is_dir(&dataset_root) {
        return Ok(manifests);
    }

    for dataset_path in runtime.read_dir(&dataset_root)? {
        if runtime.is_dir(&dataset_path) {
            let manifest_path = dataset_path.join(MANIFEST_FILE);
            if runtime.exists(&manifest_path) {
                manifests.push(manifest_path);
            }
        }
    }

    Ok(manifests)
}

/// File names inside a pipeline directory; a missing directory has none.
#[tracing::instrument(skip(runtime, pipeline_dir))]
pub fn list_pipeline_files<R: Runtime>(runtime: &R, pipeline_dir: &Path) -> Result<Vec<String>> {
    if !runtime.is_dir(pipeline_dir) {
        return Ok(Vec::new());
    }

    Ok(runtime
        .read_dir(pipeline_dir)?
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
        .collect())
}
