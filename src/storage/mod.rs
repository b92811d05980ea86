//! Object storage seam
//!
//! The pipeline talks to storage through [`ObjectStore`], a get/put pair over
//! opaque keys. [`FsStore`] maps a bucket onto a local directory with keys as
//! relative paths; [`MemoryStore`] backs unit tests. Writes are all-or-nothing:
//! `FsStore` stages into a temp file in the destination directory and renames
//! it over the final path, so a failed invocation never leaves partial output.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Result, object_not_found, storage_read_failed, storage_write_failed};

/// Blocking get/put access to an object store.
pub trait ObjectStore {
    /// Fetch the full contents of an object.
    fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Store an object, overwriting any existing one under the same key.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;
}

/// A bucket backed by a local directory; keys are relative paths under it.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ObjectStore for FsStore {
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(key);
        std::fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                object_not_found(key)
            } else {
                storage_read_failed(key, e.to_string())
            }
        })
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.object_path(key);
        let parent = path.parent().unwrap_or(&self.root);
        std::fs::create_dir_all(parent).map_err(|e| storage_write_failed(key, e.to_string()))?;

        let mut staged = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| storage_write_failed(key, e.to_string()))?;
        staged
            .write_all(bytes)
            .map_err(|e| storage_write_failed(key, e.to_string()))?;
        staged
            .persist(&path)
            .map_err(|e| storage_write_failed(key, e.to_string()))?;
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an object exists under this key.
    pub fn contains(&self, key: &str) -> bool {
        match self.objects.lock() {
            Ok(objects) => objects.contains_key(key),
            Err(_) => false,
        }
    }
}

impl ObjectStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        let objects = self
            .objects
            .lock()
            .map_err(|e| storage_read_failed(key, e.to_string()))?;
        objects.get(key).cloned().ok_or_else(|| object_not_found(key))
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|e| storage_write_failed(key, e.to_string()))?;
        objects.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
