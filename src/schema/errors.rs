//! Schema error types.

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while parsing a schema declaration or loading a
/// persisted schema file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A declared field is missing its `type` key
    #[error("field '{0}' does not have a type")]
    MissingType(String),

    /// A declared field uses a type token other than text/number/boolean
    #[error("field '{0}' has unsupported type '{1}'")]
    UnknownType(String, String),

    /// A persisted field carries an integer tag this version does not know
    #[error("field '{0}' has unknown type tag {1}")]
    UnknownTag(String, i64),

    /// The schema document itself has the wrong shape
    #[error("malformed schema: {0}")]
    Malformed(String),
}
