//! Field and schema definitions with their wire and persisted encodings.
//!
//! A schema is declared once at table creation in the wire form
//! (`{ "age": { "type": "number", "indexed": true } }`) and written to
//! `table.json` in a tagged form whose integer tags predate this
//! implementation (Boolean=1, Number=6, Text=24). Existing data files use
//! the tagged form, so both encodings must round-trip.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};

/// Declared type of a field. Governs comparison semantics in filters
/// and sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// UTF-8 string, compared lexicographically
    Text,
    /// 64-bit float, compared numerically
    Number,
    /// Boolean
    Boolean,
}

impl FieldType {
    /// Integer tag used by the persisted `table.json` form.
    pub fn tag(self) -> i64 {
        match self {
            FieldType::Boolean => 1,
            FieldType::Number => 6,
            FieldType::Text => 24,
        }
    }

    /// Inverse of [`FieldType::tag`].
    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            1 => Some(FieldType::Boolean),
            6 => Some(FieldType::Number),
            24 => Some(FieldType::Text),
            _ => None,
        }
    }

    /// Token accepted in the wire declaration.
    pub fn token(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }

    /// Inverse of [`FieldType::token`].
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "text" => Some(FieldType::Text),
            "number" => Some(FieldType::Number),
            "boolean" => Some(FieldType::Boolean),
            _ => None,
        }
    }
}

/// A single declared field. Immutable once the table exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name, unique within the table, case-sensitive
    pub name: String,
    /// Declared type
    pub field_type: FieldType,
    /// Whether the field participates in the secondary index
    pub indexed: bool,
}

/// Persisted encoding of a field inside `table.json`.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedField {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Type")]
    tag: i64,
    #[serde(rename = "Indexed", default)]
    indexed: bool,
}

/// Persisted encoding of a whole schema (`table.json` body).
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSchema {
    fields: BTreeMap<String, PersistedField>,
}

/// The declared fields of a table, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: BTreeMap<String, Field>,
}

impl Schema {
    /// Parses the wire declaration sent at table creation:
    /// a mapping from field name to `{ "type": <token>, "indexed"?: bool }`.
    pub fn from_fields(fields: &Value) -> SchemaResult<Self> {
        let map = fields
            .as_object()
            .ok_or_else(|| SchemaError::Malformed("fields must be an object".into()))?;

        let mut fields = BTreeMap::new();

        for (name, decl) in map {
            let decl = decl.as_object().ok_or_else(|| {
                SchemaError::Malformed(format!("field '{}' must be an object", name))
            })?;

            let token = decl
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| SchemaError::MissingType(name.clone()))?;

            let field_type = FieldType::from_token(token)
                .ok_or_else(|| SchemaError::UnknownType(name.clone(), token.to_string()))?;

            let indexed = decl.get("indexed").and_then(Value::as_bool).unwrap_or(false);

            fields.insert(
                name.clone(),
                Field {
                    name: name.clone(),
                    field_type,
                    indexed,
                },
            );
        }

        Ok(Self { fields })
    }

    /// Decodes the persisted `table.json` form.
    pub fn from_persisted(bytes: &[u8]) -> SchemaResult<Self> {
        let persisted: PersistedSchema = serde_json::from_slice(bytes)
            .map_err(|e| SchemaError::Malformed(e.to_string()))?;

        let mut fields = BTreeMap::new();

        for (name, field) in persisted.fields {
            let field_type = FieldType::from_tag(field.tag)
                .ok_or_else(|| SchemaError::UnknownTag(name.clone(), field.tag))?;

            fields.insert(
                name.clone(),
                Field {
                    name: field.name,
                    field_type,
                    indexed: field.indexed,
                },
            );
        }

        Ok(Self { fields })
    }

    /// Encodes the schema in the persisted `table.json` form.
    pub fn to_persisted(&self) -> SchemaResult<Vec<u8>> {
        let persisted = PersistedSchema {
            fields: self
                .fields
                .iter()
                .map(|(name, field)| {
                    (
                        name.clone(),
                        PersistedField {
                            name: field.name.clone(),
                            tag: field.field_type.tag(),
                            indexed: field.indexed,
                        },
                    )
                })
                .collect(),
        };

        serde_json::to_vec(&persisted).map_err(|e| SchemaError::Malformed(e.to_string()))
    }

    /// Looks up a declared field.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Declared type of a field, if the field exists.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).map(|f| f.field_type)
    }

    /// Whether range comparisons on this field are numeric.
    pub fn is_numeric(&self, name: &str) -> bool {
        self.field_type(name) == Some(FieldType::Number)
    }

    /// Iterates declared fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
