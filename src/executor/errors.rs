//! Pipeline execution errors.

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for pipeline execution
pub type ExecResult<T> = Result<T, ExecError>;

/// Errors raised while running a parsed request through the pipeline.
/// The first error wins; there are no partial results.
#[derive(Debug, Error)]
pub enum ExecError {
    /// Levenshtein ordering requested on a non-text field
    #[error("can only sort text fields with levenshtein")]
    LevenshteinOnNonText,

    /// Sort on a field outside the schema's sortable type domains
    #[error("cannot sort on field '{0}'")]
    UnsortableField(String),

    /// A `><` filter whose value is not of the `"lo-hi"` form
    #[error("between value '{0}' must be of the form 'lo-hi'")]
    MalformedRange(String),

    /// Paging slice that falls outside the result set
    #[error("slice [{start}, {end}) out of range for {len} results")]
    PageOutOfRange { start: i64, end: i64, len: usize },

    /// Materialising objects from the store failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}
