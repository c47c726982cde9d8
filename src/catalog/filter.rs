//! Query predicates applied to the package index.

use log::debug;

use super::index::PackageIndex;
use super::query::Query;
use crate::error::CatalogError;
use crate::package::{Package, Version};

/// Compiled form of a [`Query`]'s filters.
///
/// Predicates run cheapest first: visibility, category, platform
/// compatibility, then name.
#[derive(Debug)]
pub struct FilterPipeline<'q> {
    internal: bool,
    category: Option<&'q str>,
    kibana_version: Option<Version>,
    package_name: Option<&'q str>,
}

impl<'q> FilterPipeline<'q> {
    pub fn compile(query: &'q Query) -> Result<Self, CatalogError> {
        Ok(Self {
            internal: query.internal,
            category: query.category.as_deref(),
            kibana_version: query.parsed_kibana_version()?,
            package_name: query.package_name.as_deref(),
        })
    }

    pub fn accepts(&self, package: &Package) -> bool {
        self.is_visible(package)
            && self.in_category(package)
            && self.is_compatible(package)
            && self.has_name(package)
    }

    pub fn apply<'a>(&self, index: &'a PackageIndex) -> Vec<&'a Package> {
        let matched: Vec<&Package> = index.iter().filter(|p| self.accepts(p)).collect();
        debug!(
            "{} of {} package version(s) passed the filters",
            matched.len(),
            index.version_count()
        );
        matched
    }

    fn is_visible(&self, package: &Package) -> bool {
        self.internal || !package.internal
    }

    fn in_category(&self, package: &Package) -> bool {
        self.category.is_none_or(|c| package.has_category(c))
    }

    fn is_compatible(&self, package: &Package) -> bool {
        self.kibana_version
            .as_ref()
            .is_none_or(|v| package.has_kibana_version(v))
    }

    fn has_name(&self, package: &Package) -> bool {
        self.package_name.is_none_or(|n| package.name == n)
    }
}

/// Every package version in `index` that survives the filters of `query`.
pub fn filter<'a>(index: &'a PackageIndex, query: &Query) -> Result<Vec<&'a Package>, CatalogError> {
    Ok(FilterPipeline::compile(query)?.apply(index))
}
