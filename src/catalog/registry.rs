//! The process-wide registry of databases.
//!
//! Built once at startup by scanning the data root; afterwards the only
//! mutation is create-database. The registry is an owned value handed to
//! the transports rather than a global.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::database::Database;
use super::errors::{CatalogError, CatalogResult};
use crate::observability::logger::{Logger, Severity};

/// All databases under one data root.
#[derive(Debug)]
pub struct Registry {
    root: PathBuf,
    databases: RwLock<HashMap<String, Arc<Database>>>,
}

impl Registry {
    /// Opens the data root (creating it when absent) and loads every
    /// database found there.
    pub fn open(root: impl Into<PathBuf>) -> CatalogResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).map_err(|source| CatalogError::CreateDir {
            path: root.clone(),
            source,
        })?;

        let entries = fs::read_dir(&root).map_err(|source| CatalogError::ListDir {
            path: root.clone(),
            source,
        })?;

        let mut databases = HashMap::new();

        for entry in entries {
            let entry = entry.map_err(|source| CatalogError::ListDir {
                path: root.clone(),
                source,
            })?;

            if !entry.path().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let database = Database::open(&name, &root)?;
            databases.insert(name.clone(), Arc::new(database));

            Logger::log(Severity::Info, "database_loaded", &[("database", &name)]);
        }

        Ok(Self {
            root,
            databases: RwLock::new(databases),
        })
    }

    /// Data root this registry scans.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of the loaded databases.
    pub fn database_names(&self) -> Vec<String> {
        self.databases
            .read()
            .expect("registry lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Looks a database up.
    pub fn database(&self, name: &str) -> CatalogResult<Arc<Database>> {
        self.databases
            .read()
            .expect("registry lock poisoned")
            .get(name)
            .cloned()
            .ok_or_else(|| CatalogError::DatabaseNotFound(name.to_string()))
    }

    /// Creates a database on disk and registers it.
    pub fn create_database(&self, name: &str) -> CatalogResult<()> {
        let database = Database::create(name, &self.root)?;

        self.databases
            .write()
            .expect("registry lock poisoned")
            .insert(name.to_string(), Arc::new(database));

        Ok(())
    }
}
