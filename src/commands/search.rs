use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::{
    catalog::{Catalog, Query, to_json},
    package::FsManifestLoader,
    runtime::Runtime,
};

use super::paths::packages_root;

/// Search the package tree and print the result as JSON
#[tracing::instrument(skip(runtime, root))]
pub fn search<R: Runtime>(
    runtime: R,
    root: Option<PathBuf>,
    query: &Query,
    strict: bool,
) -> Result<()> {
    let output = render_search(runtime, root, query, strict)?;
    println!("{}", output);
    Ok(())
}

/// Run a search and return the JSON document instead of printing it.
///
/// Packages that fail to load are skipped unless `strict` is set.
pub fn render_search<R: Runtime>(
    runtime: R,
    root: Option<PathBuf>,
    query: &Query,
    strict: bool,
) -> Result<String> {
    let root = packages_root(root);
    let loader = FsManifestLoader::new(runtime, root);

    let (catalog, failures) =
        Catalog::load(&loader).context("Failed to build the package index")?;
    if strict && !failures.is_empty() {
        anyhow::bail!("{} package(s) failed to load", failures.len());
    }

    let results = catalog.search(query).context("Invalid search query")?;
    debug!("Search matched {} package(s)", results.len());

    Ok(to_json(&results)?)
}
