//! Common test utilities for surveymerge integration tests

use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(dead_code)]
pub const ANXIETY_KEY: &str = "SF_HOMELESS_ANXIETY.csv";
#[allow(dead_code)]
pub const DEMOGRAPHICS_KEY: &str = "SF_HOMELESS_DEMOGRAPHICS.csv";
#[allow(dead_code)]
pub const OUTPUT_KEY: &str = "processed/merged_data.csv";

/// A directory-backed test bucket
pub struct TestBucket {
    /// Temporary directory holding the bucket
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to the bucket root
    pub path: PathBuf,
}

impl TestBucket {
    /// Create an empty test bucket
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Create a bucket seeded with the two canonical input datasets
    #[allow(dead_code)]
    pub fn seeded() -> Self {
        let bucket = Self::new();
        bucket.write_object(ANXIETY_KEY, "HID,anx\n1,high\n2,low\n");
        bucket.write_object(DEMOGRAPHICS_KEY, "HID,age\n1,30\n3,40\n");
        bucket
    }

    /// Write an object into the bucket, creating parent directories
    pub fn write_object(&self, key: &str, contents: &str) {
        let path = self.path.join(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create object parent");
        }
        std::fs::write(path, contents).expect("Failed to write object");
    }

    /// Read an object back, or None if absent
    #[allow(dead_code)]
    pub fn read_object(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path.join(key)).ok()
    }

    /// Whether an object exists under this key
    #[allow(dead_code)]
    pub fn has_object(&self, key: &str) -> bool {
        self.path.join(key).is_file()
    }

    /// Write a sidecar file (event payload, policy) next to the bucket and
    /// return its path
    #[allow(dead_code)]
    pub fn write_sidecar(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path.join(name);
        std::fs::write(&path, contents).expect("Failed to write sidecar file");
        path
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
