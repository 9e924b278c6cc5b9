//! Storage error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Filesystem and codec failures in the object store. Fatal to the
/// current operation only.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading a document file or listing the objects directory failed
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    /// Writing or syncing a document file failed
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    /// A document file does not contain a valid attribute map
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A document could not be serialised
    #[error("failed to encode document '{id}': {source}")]
    Encode {
        id: String,
        source: serde_json::Error,
    },
}
