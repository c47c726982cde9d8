//! Catalog resolution engine.
//!
//! A search runs in four steps over one immutable [`PackageIndex`]:
//!
//! ```text
//! PackageIndex ──filter──▶ matching versions ──select──▶ exposed versions ──format──▶ ResultSet
//! ```
//!
//! [`Catalog`] owns the current index snapshot and swaps in a freshly built
//! one on rebuild, so a running search always sees one complete index.

mod filter;
mod index;
mod output;
mod query;
mod select;
mod snapshot;

pub use filter::{FilterPipeline, filter};
pub use index::PackageIndex;
pub use output::{PackageSummary, ResultSet, format, to_json};
pub use query::Query;
pub use select::select;
pub use snapshot::{Catalog, spawn_refresh};

use crate::error::CatalogError;

/// Resolve `query` against `index`.
///
/// Without `all` each package name appears once, at its newest version among
/// the versions that passed the filters. This also holds when a package name
/// is given.
pub fn search(index: &PackageIndex, query: &Query) -> Result<ResultSet, CatalogError> {
    let matched = filter(index, query)?;
    let selected = select(matched, query.all);
    Ok(format(selected))
}
