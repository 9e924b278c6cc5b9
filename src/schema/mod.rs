//! Table schemas: declared fields with a type and an indexed flag.

pub mod errors;
pub mod types;

pub use errors::{SchemaError, SchemaResult};
pub use types::{Field, FieldType, Schema};
