//! A named database owning its tables.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde_json::Value;

use super::errors::{CatalogError, CatalogResult};
use super::table::Table;
use crate::observability::logger::{Logger, Severity};
use crate::schema::Schema;

/// One database: a directory of tables under `<root>/<name>/tables/`.
#[derive(Debug)]
pub struct Database {
    name: String,
    tables_path: PathBuf,
    tables: RwLock<HashMap<String, Arc<Table>>>,
}

impl Database {
    /// Creates the database directories on disk and returns the empty
    /// database. Creating a name that already exists is permitted and
    /// leaves existing tables alone.
    pub fn create(name: &str, root: &Path) -> CatalogResult<Self> {
        let tables_path = root.join(name).join("tables");
        fs::create_dir_all(&tables_path).map_err(|source| CatalogError::CreateDir {
            path: tables_path.clone(),
            source,
        })?;

        Ok(Self {
            name: name.to_string(),
            tables_path,
            tables: RwLock::new(HashMap::new()),
        })
    }

    /// Opens an existing database, loading every table under it.
    pub fn open(name: &str, root: &Path) -> CatalogResult<Self> {
        let tables_path = root.join(name).join("tables");

        let entries = fs::read_dir(&tables_path).map_err(|source| CatalogError::ListDir {
            path: tables_path.clone(),
            source,
        })?;

        let mut tables = HashMap::new();

        for entry in entries {
            let entry = entry.map_err(|source| CatalogError::ListDir {
                path: tables_path.clone(),
                source,
            })?;

            if !entry.path().is_dir() {
                continue;
            }

            let table_name = entry.file_name().to_string_lossy().into_owned();
            let table = Table::open(&table_name, &tables_path)?;
            tables.insert(table_name.clone(), Arc::new(table));

            Logger::log(
                Severity::Info,
                "table_loaded",
                &[("database", name), ("table", &table_name)],
            );
        }

        Ok(Self {
            name: name.to_string(),
            tables_path,
            tables: RwLock::new(tables),
        })
    }

    /// Database name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the loaded tables.
    pub fn table_names(&self) -> Vec<String> {
        self.tables
            .read()
            .expect("tables lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Looks a table up.
    pub fn table(&self, name: &str) -> CatalogResult<Arc<Table>> {
        self.tables
            .read()
            .expect("tables lock poisoned")
            .get(name)
            .cloned()
            .ok_or_else(|| CatalogError::TableNotFound(name.to_string()))
    }

    /// Creates a table from a wire schema declaration and registers it.
    pub fn create_table(&self, name: &str, fields: &Value) -> CatalogResult<()> {
        let schema = Schema::from_fields(fields)?;
        let table = Table::create(name, &self.tables_path, schema)?;

        self.tables
            .write()
            .expect("tables lock poisoned")
            .insert(name.to_string(), Arc::new(table));

        Ok(())
    }
}
