//! Route definitions consumed by the matcher.
//!
//! The framework registers routes programmatically as [`RouteSpec`] tuples at
//! startup. For deployments that keep their route map in a file (and for the
//! hot-reload watcher), [`load_routes`] reads the same definitions from YAML
//! or JSON.

mod load;
mod types;

pub use load::{load_routes, routes_from_str};
pub use types::RouteSpec;
