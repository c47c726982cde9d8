//! Collapse package versions down to the ones a query exposes.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::package::Package;

/// Keep the newest version per package name, or everything when `all` is set.
///
/// When two entries of the same name carry equal versions the first one
/// encountered wins, so the result only depends on the input order.
pub fn select<'a>(filtered: Vec<&'a Package>, all: bool) -> Vec<&'a Package> {
    if all {
        return filtered;
    }

    let mut newest: BTreeMap<&str, &'a Package> = BTreeMap::new();
    for package in filtered {
        match newest.entry(package.name.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(package);
            }
            Entry::Occupied(mut slot) => {
                if package.is_newer(slot.get()) {
                    slot.insert(package);
                }
            }
        }
    }

    newest.into_values().collect()
}
