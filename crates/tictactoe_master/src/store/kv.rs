//! Key-value storage capability.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::store::StoreError;

/// Minimal string key-value store.
///
/// Stats persistence only needs `get` and `set`, so anything offering those
/// two operations can back it.
pub trait KeyValueStore {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, useful for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON object file mapping keys to strings.
///
/// A missing file reads as an empty store. Writes create parent directories.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store at `path`. Nothing is touched until first access.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file that new contents are written to before the rename.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            debug!("Store file missing, treating as empty");
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            StoreError::new(format!(
                "Failed to parse store file '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        // Readers see either the old file or the new one, never a partial write
        let staging = self.staging_path();
        std::fs::write(&staging, serde_json::to_string_pretty(&entries)?)?;
        std::fs::rename(&staging, &self.path)?;
        debug!("Store file written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_overwrites() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").expect("get"), None);
        store.set("k", "1").expect("set");
        store.set("k", "2").expect("set");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("2"));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get("anything").expect("get"), None);
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("store.json");
        let mut store = FileStore::new(&path);
        store.set("a", "1").expect("set a");
        store.set("b", "2").expect("set b");

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("a").expect("get").as_deref(), Some("1"));
        assert_eq!(reopened.get("b").expect("get").as_deref(), Some("2"));
    }

    #[test]
    fn test_file_store_write_leaves_no_staging_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.json");
        let mut store = FileStore::new(&path);
        store.set("a", "1").expect("set");

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read dir")
            .map(|e| e.expect("entry").file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("store.json")]);
    }

    #[test]
    fn test_file_store_ignores_stale_staging_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.json");
        let mut store = FileStore::new(&path);
        store.set("a", "1").expect("set a");

        // Leftover from an interrupted write
        std::fs::write(dir.path().join("store.json.tmp"), "{\"a\": \"tr").expect("write");

        assert_eq!(store.get("a").expect("get").as_deref(), Some("1"));
        store.set("b", "2").expect("set b");
        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("a").expect("get").as_deref(), Some("1"));
        assert_eq!(reopened.get("b").expect("get").as_deref(), Some("2"));
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").expect("write");
        assert!(FileStore::new(&path).get("a").is_err());
    }
}
