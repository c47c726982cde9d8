pub mod catalog;
pub mod commands;
pub mod error;
pub mod package;
pub mod runtime;

pub use error::CatalogError;

/// Test helpers shared by the unit tests.
#[cfg(test)]
pub mod test_utils {
    use crate::package::{Package, Version};

    /// A bare package with the given name and version.
    pub fn package(name: &str, version: &str) -> Package {
        Package::new(name, Version::parse(version).unwrap())
    }
}
