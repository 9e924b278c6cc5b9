//! Request parse errors.

use thiserror::Error;

/// Result type for envelope parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// A malformed request envelope. The request is rejected; nothing runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Operator token outside `=`, `!=`, `>`, `<`, `><`
    #[error("operator not supported: '{0}'")]
    UnknownOperator(String),

    /// Sort direction outside `asc`, `desc`
    #[error("unknown sort direction: '{0}'")]
    UnknownDirection(String),

    /// Filter value that is not a string, number or boolean
    #[error("value type not supported")]
    UnsupportedValue,

    /// A single where node carrying both an `and` and an `or` child
    #[error("cannot combine 'and' and 'or' in one where clause")]
    MixedCombinators,

    /// An envelope key whose value is not the expected JSON shape
    #[error("'{key}' must be {expected}")]
    UnexpectedShape {
        key: &'static str,
        expected: &'static str,
    },
}

impl ParseError {
    /// Shorthand for [`ParseError::UnexpectedShape`].
    pub fn shape(key: &'static str, expected: &'static str) -> Self {
        Self::UnexpectedShape { key, expected }
    }
}
