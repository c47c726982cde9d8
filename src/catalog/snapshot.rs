use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};
use tokio::task::JoinHandle;

use super::index::PackageIndex;
use super::output::ResultSet;
use super::query::Query;
use crate::error::CatalogError;
use crate::package::{LoadFailure, ManifestLoader};

/// Holder of the live package index.
///
/// Readers take an `Arc` to the current index and keep using it even while
/// a rebuild swaps in a new one.
#[derive(Debug, Default)]
pub struct Catalog {
    current: RwLock<Arc<PackageIndex>>,
}

impl Catalog {
    pub fn new(index: PackageIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// Build a catalog straight from a loader.
    pub fn load<L: ManifestLoader + ?Sized>(loader: &L) -> Result<(Self, Vec<LoadFailure>)> {
        let catalog = Catalog::default();
        let failures = catalog.rebuild(loader)?;
        Ok((catalog, failures))
    }

    pub fn snapshot(&self) -> Arc<PackageIndex> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn replace(&self, index: PackageIndex) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(index);
    }

    /// Reload every package and swap in the new index.
    ///
    /// Packages that failed to load are left out and returned. If the index
    /// itself cannot be built the previous snapshot stays live.
    #[tracing::instrument(skip(self, loader))]
    pub fn rebuild<L: ManifestLoader + ?Sized>(&self, loader: &L) -> Result<Vec<LoadFailure>> {
        let report = loader.load_all()?;
        let index = PackageIndex::build(report.packages)?;

        info!(
            "Catalog rebuilt: {} package(s), {} version(s), {} failure(s)",
            index.package_count(),
            index.version_count(),
            report.failures.len()
        );

        self.replace(index);
        Ok(report.failures)
    }

    pub fn search(&self, query: &Query) -> Result<ResultSet, CatalogError> {
        super::search(&self.snapshot(), query)
    }
}

/// Rebuild `catalog` from `loader` every `period` on the tokio runtime.
///
/// The first rebuild happens immediately. Failed rebuilds are logged and the
/// previous snapshot keeps serving.
pub fn spawn_refresh<L>(catalog: Arc<Catalog>, loader: Arc<L>, period: Duration) -> JoinHandle<()>
where
    L: ManifestLoader + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;

            let catalog = Arc::clone(&catalog);
            let loader = Arc::clone(&loader);
            match tokio::task::spawn_blocking(move || catalog.rebuild(loader.as_ref())).await {
                Ok(Ok(failures)) => {
                    for failure in failures {
                        warn!("Package {:?} not indexed: {:#}", failure.path, failure.error);
                    }
                }
                Ok(Err(e)) => warn!("Catalog rebuild failed, keeping previous index: {:#}", e),
                Err(e) => warn!("Catalog rebuild task failed: {}", e),
            }
        }
    })
}
