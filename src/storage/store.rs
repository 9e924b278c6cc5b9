//! On-disk object store: one JSON file per document under `objects/`.
//!
//! The file is named by the object id and holds the attribute map only;
//! the id is carried by the filename. Writes are synced before they are
//! acknowledged so the index never points at an absent file.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::object::{Object, Scalar};

/// Object files of a single table.
#[derive(Debug)]
pub struct ObjectStore {
    dir: PathBuf,
}

impl ObjectStore {
    /// Wraps an existing objects directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the objects directory (and parents) and wraps it.
    pub fn create(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Write {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Directory holding the object files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes one document file and syncs it to disk. The index must only
    /// be updated after this returns.
    pub fn write(&self, object: &Object) -> StorageResult<()> {
        let bytes = serde_json::to_vec(&object.attrs).map_err(|source| StorageError::Encode {
            id: object.id.clone(),
            source,
        })?;

        let path = self.dir.join(&object.id);
        let write_err = |source| StorageError::Write {
            path: self.dir.join(&object.id),
            source,
        };

        let mut file = File::create(&path).map_err(&write_err)?;
        file.write_all(&bytes).map_err(&write_err)?;
        file.sync_all().map_err(&write_err)?;

        Ok(())
    }

    /// Reads one document back by id.
    pub fn read(&self, id: &str) -> StorageResult<Object> {
        let path = self.dir.join(id);

        let bytes = fs::read(&path).map_err(|source| StorageError::Read {
            path: path.clone(),
            source,
        })?;

        let attrs: BTreeMap<String, Scalar> =
            serde_json::from_slice(&bytes).map_err(|source| StorageError::Decode {
                path: path.clone(),
                source,
            })?;

        Ok(Object::new(id, attrs))
    }

    /// Reads every document in the directory. Used to rebuild the index at
    /// table open and for full-table scans. A failure on any single file
    /// fails the whole load.
    pub fn load_all(&self) -> StorageResult<Vec<Object>> {
        let entries = fs::read_dir(&self.dir).map_err(|source| StorageError::Read {
            path: self.dir.clone(),
            source,
        })?;

        let mut objects = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|source| StorageError::Read {
                path: self.dir.clone(),
                source,
            })?;

            let id = entry.file_name().to_string_lossy().into_owned();
            objects.push(self.read(&id)?);
        }

        Ok(objects)
    }
}
