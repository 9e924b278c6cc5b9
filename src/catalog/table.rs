//! A table: declared schema, secondary index and object files.
//!
//! The schema file and the objects directory exist together or not at
//! all; `create` writes both before the table is loaded. The index lives
//! behind a `RwLock`: queries share read access, inserts take the write
//! side, which serialises writers per table while leaving other tables
//! untouched. The document file is written and synced before the index
//! is updated, so a crash can leave an unindexed file (repaired by the
//! rebuild at open) but never an index entry without a file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use serde_json::Value;
use uuid::Uuid;

use super::errors::{CatalogError, CatalogResult};
use crate::executor::Pipeline;
use crate::index::Index;
use crate::query::parse_request;
use crate::schema::Schema;
use crate::storage::{Object, ObjectStore, Objects, Scalar, StorageError};

const SCHEMA_FILE: &str = "table.json";
const OBJECTS_DIR: &str = "objects";

/// One table of a database.
#[derive(Debug)]
pub struct Table {
    name: String,
    schema: Schema,
    store: ObjectStore,
    index: RwLock<Index>,
}

impl Table {
    /// Creates the table on disk (schema file plus empty objects
    /// directory) and loads it.
    pub fn create(name: &str, tables_path: &Path, schema: Schema) -> CatalogResult<Self> {
        let dir = tables_path.join(name);
        ObjectStore::create(dir.join(OBJECTS_DIR))?;

        let schema_path = dir.join(SCHEMA_FILE);
        let bytes = schema.to_persisted()?;
        fs::write(&schema_path, bytes).map_err(|source| StorageError::Write {
            path: schema_path,
            source,
        })?;

        Self::open(name, tables_path)
    }

    /// Loads a table from disk and rebuilds its index from the object
    /// files. A failure on any single file fails the open.
    pub fn open(name: &str, tables_path: &Path) -> CatalogResult<Self> {
        let dir = tables_path.join(name);

        let schema_path = dir.join(SCHEMA_FILE);
        let bytes = fs::read(&schema_path).map_err(|source| StorageError::Read {
            path: schema_path,
            source,
        })?;
        let schema = Schema::from_persisted(&bytes)?;

        let store = ObjectStore::new(dir.join(OBJECTS_DIR));

        let mut index = Index::new();
        for object in store.load_all()? {
            index_object(&schema, &mut index, &object);
        }

        Ok(Self {
            name: name.to_string(),
            schema,
            store,
            index: RwLock::new(index),
        })
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Inserts a document: assigns it a UUIDv4, writes the file, then
    /// indexes every indexed schema field the document carries. Returns
    /// the generated id.
    pub fn insert(&self, attrs: BTreeMap<String, Scalar>) -> CatalogResult<String> {
        let object = Object::new(Uuid::new_v4().to_string(), attrs);

        self.store.write(&object)?;

        let mut index = self.index.write().expect("table index lock poisoned");
        index_object(&self.schema, &mut index, &object);

        Ok(object.id)
    }

    /// Parses a request envelope and runs the query pipeline.
    pub fn query(&self, envelope: &Value) -> CatalogResult<Objects> {
        let request = parse_request(envelope)?;

        let index = self.index.read().expect("table index lock poisoned");
        let objects = Pipeline::new(&self.schema, &index, &self.store).run(&request)?;

        Ok(objects)
    }

    /// Flattened (value, id) index entries for one field; used by tests
    /// to check the rebuild invariant.
    pub fn index_entries(&self, field: &str) -> Vec<(String, String)> {
        self.index
            .read()
            .expect("table index lock poisoned")
            .entries(field)
    }
}

/// Records every indexed schema field present in the object.
fn index_object(schema: &Schema, index: &mut Index, object: &Object) {
    for field in schema.fields() {
        if !field.indexed {
            continue;
        }
        if let Some(value) = object.rendered(&field.name) {
            index.add(&field.name, value, object.id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::from_fields(&json!({
            "a": {"type": "text", "indexed": true},
            "b": {"type": "number", "indexed": true},
            "c": {"type": "text"},
        }))
        .unwrap()
    }

    fn doc(a: &str, b: f64) -> BTreeMap<String, Scalar> {
        let mut attrs = BTreeMap::new();
        attrs.insert("a".to_string(), Scalar::Text(a.into()));
        attrs.insert("b".to_string(), Scalar::Number(b));
        attrs
    }

    #[test]
    fn create_writes_schema_and_objects_dir() {
        let dir = tempfile::tempdir().unwrap();
        Table::create("t", dir.path(), schema()).unwrap();

        assert!(dir.path().join("t/table.json").is_file());
        assert!(dir.path().join("t/objects").is_dir());
    }

    #[test]
    fn insert_then_query_through_the_index() {
        let dir = tempfile::tempdir().unwrap();
        let table = Table::create("t", dir.path(), schema()).unwrap();

        table.insert(doc("x", 1.0)).unwrap();
        table.insert(doc("y", 2.0)).unwrap();
        table.insert(doc("x", 3.0)).unwrap();

        let results = table
            .query(&json!({"where": {"field": "a", "operator": "=", "value": "x"}}))
            .unwrap();

        let mut b_values: Vec<String> =
            results.iter().filter_map(|o| o.rendered("b")).collect();
        b_values.sort();
        assert_eq!(b_values, ["1", "3"]);
    }

    #[test]
    fn unindexed_fields_stay_out_of_the_index() {
        let dir = tempfile::tempdir().unwrap();
        let table = Table::create("t", dir.path(), schema()).unwrap();

        let mut attrs = doc("x", 1.0);
        attrs.insert("c".to_string(), Scalar::Text("quiet".into()));
        table.insert(attrs).unwrap();

        assert!(table.index_entries("c").is_empty());
        let results = table
            .query(&json!({"where": {"field": "c", "operator": "=", "value": "quiet"}}))
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn fields_outside_the_schema_are_stored_but_not_indexed() {
        let dir = tempfile::tempdir().unwrap();
        let table = Table::create("t", dir.path(), schema()).unwrap();

        let mut attrs = doc("x", 1.0);
        attrs.insert("extra".to_string(), Scalar::Text("kept".into()));
        let id = table.insert(attrs).unwrap();

        assert!(table.index_entries("extra").is_empty());

        // The attribute survives on disk and rides along in results.
        let results = table
            .query(&json!({"where": {"field": "a", "operator": "=", "value": "x"}}))
            .unwrap();
        let object = results.iter().find(|o| o.id == id).unwrap();
        assert_eq!(object.rendered("extra").as_deref(), Some("kept"));
    }

    #[test]
    fn reopen_rebuilds_an_equal_index() {
        let dir = tempfile::tempdir().unwrap();
        let table = Table::create("t", dir.path(), schema()).unwrap();

        table.insert(doc("x", 1.0)).unwrap();
        table.insert(doc("y", 2.0)).unwrap();

        let before_a = table.index_entries("a");
        let before_b = table.index_entries("b");
        drop(table);

        let reopened = Table::open("t", dir.path()).unwrap();
        assert_eq!(reopened.index_entries("a"), before_a);
        assert_eq!(reopened.index_entries("b"), before_b);
    }

    #[test]
    fn index_matches_insert_history() {
        let dir = tempfile::tempdir().unwrap();
        let table = Table::create("t", dir.path(), schema()).unwrap();

        let id1 = table.insert(doc("x", 1.0)).unwrap();
        let id2 = table.insert(doc("x", 2.0)).unwrap();

        let mut expected = vec![("x".to_string(), id1), ("x".to_string(), id2)];
        expected.sort();
        assert_eq!(table.index_entries("a"), expected);
    }

    #[test]
    fn opening_a_missing_table_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Table::open("ghost", dir.path()).is_err());
    }
}
