use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::{
    catalog::PackageIndex,
    package::{FsManifestLoader, LoadFailure, ManifestLoader},
    runtime::Runtime,
};

use super::paths::packages_root;

/// Outcome of validating a package tree.
#[derive(Debug)]
pub struct ValidationSummary {
    pub packages: usize,
    pub versions: usize,
    pub failures: Vec<LoadFailure>,
}

/// Validate every package in the tree, printing one line per failure
#[tracing::instrument(skip(runtime, root))]
pub fn validate<R: Runtime>(runtime: R, root: Option<PathBuf>) -> Result<()> {
    let summary = check_packages(runtime, root)?;

    for failure in &summary.failures {
        println!("FAIL {}: {:#}", failure.path.display(), failure.error);
    }

    if !summary.failures.is_empty() {
        anyhow::bail!("{} package(s) failed validation", summary.failures.len());
    }

    println!(
        "{} package(s), {} version(s) valid",
        summary.packages, summary.versions
    );
    Ok(())
}

/// Load and index the tree without printing anything.
///
/// Per-package failures end up in the summary; a duplicated name/version
/// pair fails the whole check.
pub fn check_packages<R: Runtime>(runtime: R, root: Option<PathBuf>) -> Result<ValidationSummary> {
    let root = packages_root(root);
    let loader = FsManifestLoader::new(runtime, root);

    let report = loader.load_all()?;
    debug!(
        "Loaded {} package(s), {} failure(s)",
        report.packages.len(),
        report.failures.len()
    );

    let index = PackageIndex::build(report.packages).with_context(|| {
        format!("Package tree {:?} is inconsistent", loader.root())
    })?;

    Ok(ValidationSummary {
        packages: index.package_count(),
        versions: index.version_count(),
        failures: report.failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    /// Two package directories whose manifests hold the given contents.
    fn two_package_runtime(first: &'static str, second: &'static str) -> MockRuntime {
        let mut runtime = MockRuntime::new();
        let root = PathBuf::from("/root");

        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_is_dir()
            .returning(|p| !p.ends_with("dataset"));
        runtime
            .expect_read_dir()
            .with(eq(root.clone()))
            .returning(|p| Ok(vec![p.join("a"), p.join("b")]));
        runtime
            .expect_read_dir()
            .with(eq(root.join("a")))
            .returning(|p| Ok(vec![p.join("1.0.0")]));
        runtime
            .expect_read_dir()
            .with(eq(root.join("b")))
            .returning(|p| Ok(vec![p.join("1.0.0")]));
        runtime
            .expect_read_to_string()
            .with(eq(root.join("a/1.0.0/manifest.yml")))
            .returning(move |_| Ok(first.to_string()));
        runtime
            .expect_read_to_string()
            .with(eq(root.join("b/1.0.0/manifest.yml")))
            .returning(move |_| Ok(second.to_string()));

        runtime
    }

    #[test]
    fn test_check_packages_valid() {
        let runtime = two_package_runtime(
            "name: apache\nversion: 1.0.0\n",
            "name: nginx\nversion: 1.0.0\n",
        );
        let summary = check_packages(runtime, Some(PathBuf::from("/root"))).unwrap();
        assert_eq!(summary.packages, 2);
        assert_eq!(summary.versions, 2);
        assert!(summary.failures.is_empty());
    }

    #[test]
    fn test_check_packages_reports_failure() {
        let runtime = two_package_runtime("name: apache\nversion: 1.0.0\n", "name: ''\nversion: 1.0.0\n");
        let summary = check_packages(runtime, Some(PathBuf::from("/root"))).unwrap();
        assert_eq!(summary.versions, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(
            summary.failures[0].path,
            PathBuf::from("/root/b/1.0.0/manifest.yml")
        );
    }

    #[test]
    fn test_check_packages_duplicate_is_fatal() {
        let runtime = two_package_runtime(
            "name: nginx\nversion: 1.0.0\n",
            "name: nginx\nversion: 1.0.0\n",
        );
        let err = check_packages(runtime, Some(PathBuf::from("/root"))).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::DuplicateVersion { .. })
        ));
    }

    #[test]
    fn test_validate_fails_with_broken_package() {
        let runtime = two_package_runtime("name: apache\nversion: 1.0.0\n", "not: [valid");
        assert!(validate(runtime, Some(PathBuf::from("/root"))).is_err());
    }
}
