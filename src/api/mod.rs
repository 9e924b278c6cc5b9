//! Operation facade shared by the HTTP and WebSocket transports.
//!
//! Each operation returns the JSON body the transports hand back to the
//! client; errors carry the message rendered into the 500-class reply.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::catalog::{CatalogError, CatalogResult, Registry};
use crate::storage::Scalar;

/// The engine's client-facing operations.
#[derive(Debug)]
pub struct Api {
    registry: Registry,
}

impl Api {
    /// Wraps an opened registry.
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Shared handle used by the transports.
    pub fn shared(registry: Registry) -> Arc<Self> {
        Arc::new(Self::new(registry))
    }

    /// Names of all known databases.
    pub fn get_databases(&self) -> CatalogResult<Value> {
        Ok(json!({ "databases": self.registry.database_names() }))
    }

    /// Creates a database and registers it.
    pub fn create_database(&self, name: &str) -> CatalogResult<Value> {
        self.registry.create_database(name)?;

        Ok(json!({ "message": "Created database", "name": name }))
    }

    /// Describes one database.
    pub fn get_database(&self, name: &str) -> CatalogResult<Value> {
        let database = self.registry.database(name)?;

        Ok(json!({ "name": database.name() }))
    }

    /// Names of a database's tables.
    pub fn get_database_tables(&self, name: &str) -> CatalogResult<Value> {
        let database = self.registry.database(name)?;

        Ok(json!({ "name": name, "tables": database.table_names() }))
    }

    /// Creates a table from a wire schema declaration.
    pub fn create_table_in_database(
        &self,
        name: &str,
        table_name: &str,
        fields: &Value,
    ) -> CatalogResult<Value> {
        let database = self.registry.database(name)?;
        database.create_table(table_name, fields)?;

        Ok(json!({ "name": name, "tableName": table_name, "fields": fields }))
    }

    /// Runs a query request against a table. Results carry the documents'
    /// attribute maps in pipeline order.
    pub fn get_from_database_table(
        &self,
        name: &str,
        table_name: &str,
        request: &Value,
    ) -> CatalogResult<Value> {
        let database = self.registry.database(name)?;
        let table = database.table(table_name)?;

        let objects = table.query(request)?;

        let results: Vec<Value> = objects
            .iter()
            .map(|object| {
                serde_json::to_value(&object.attrs).unwrap_or_else(|_| Value::Null)
            })
            .collect();

        Ok(json!({
            "name": name,
            "tableName": table_name,
            "request": request,
            "results": results,
        }))
    }

    /// Inserts a document into a table; returns the generated object id.
    pub fn insert_to_database_table(
        &self,
        name: &str,
        table_name: &str,
        object: &Value,
    ) -> CatalogResult<Value> {
        let database = self.registry.database(name)?;
        let table = database.table(table_name)?;

        let attrs = decode_document(object)?;
        let object_id = table.insert(attrs)?;

        Ok(json!({
            "name": name,
            "tableName": table_name,
            "object": object,
            "objectId": object_id,
        }))
    }
}

/// Decodes a wire document into the scalar attribute map; any nested
/// array, object or null value rejects the insert.
fn decode_document(object: &Value) -> CatalogResult<BTreeMap<String, Scalar>> {
    serde_json::from_value(object.clone()).map_err(|_| CatalogError::InvalidDocument)
}
