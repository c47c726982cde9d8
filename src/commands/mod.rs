mod paths;
mod search;
mod validate;

pub use paths::{DEFAULT_PACKAGES_ROOT, packages_root};
pub use search::{render_search, search};
pub use validate::{ValidationSummary, check_packages, validate};
