//! Catalog error types.
//!
//! The catalog sits at the engine boundary, so its error aggregates every
//! subsystem failure a request can surface; transports render the
//! `Display` form as the response message.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::executor::ExecError;
use crate::query::ParseError;
use crate::schema::SchemaError;
use crate::storage::StorageError;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors surfaced by registry, database and table operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Referenced database does not exist
    #[error("database '{0}' not found")]
    DatabaseNotFound(String),

    /// Referenced table does not exist
    #[error("table '{0}' not found")]
    TableNotFound(String),

    /// Creating a database or table directory failed
    #[error("failed to create {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    /// Listing a databases or tables directory failed
    #[error("failed to list {path}: {source}")]
    ListDir { path: PathBuf, source: io::Error },

    /// A document in the request body is not a map of scalars
    #[error("document must be a JSON object of scalar values")]
    InvalidDocument,

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
