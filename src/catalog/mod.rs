//! Databases, tables and the process-wide registry.

pub mod database;
pub mod errors;
pub mod registry;
pub mod table;

pub use database::Database;
pub use errors::{CatalogError, CatalogResult};
pub use registry::Registry;
pub use table::Table;
