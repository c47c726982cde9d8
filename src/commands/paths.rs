use log::debug;
use std::path::PathBuf;

/// Package tree used when neither `--root` nor `PKGCAT_ROOT` is given.
pub const DEFAULT_PACKAGES_ROOT: &str = "packages";

/// Resolve the package tree root.
#[tracing::instrument]
pub fn packages_root(root: Option<PathBuf>) -> PathBuf {
    let root = root.unwrap_or_else(|| PathBuf::from(DEFAULT_PACKAGES_ROOT));
    debug!("Using packages root: {}", root.display());
    root
}
