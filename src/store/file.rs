//! File-backed key/value store
//!
//! The native stand-in for `localStorage`: a single JSON object on disk.
//! Every write rewrites the file through a temporary sibling and a rename.
//! A file that no longer parses is reset to an empty object.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreResult};

/// File name used inside the data directory
pub const STORE_FILE_NAME: &str = "local_storage.json";

/// JSON-file key/value store
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in `<data_dir>/local_storage.json`
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(STORE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> StoreResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => Ok(entries),
                Err(e) => {
                    // An unreadable file holds nothing we can recover
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Resetting unreadable store file"
                    );
                    let entries = BTreeMap::new();
                    self.write_all(&entries)?;
                    Ok(entries)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::in_dir(dir.path());
        assert!(store.get("anything").unwrap().is_none());
        store.remove("anything").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_get_remove_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("adalend");

        let store = FileStore::in_dir(&nested);
        store.set("adalend.wallet", "{\"connected\":true}").unwrap();
        store.set("other", "1").unwrap();

        let reopened = FileStore::in_dir(&nested);
        assert_eq!(
            reopened.get("adalend.wallet").unwrap().as_deref(),
            Some("{\"connected\":true}")
        );

        reopened.remove("adalend.wallet").unwrap();
        assert!(store.get("adalend.wallet").unwrap().is_none());
        assert_eq!(store.get("other").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_garbage_file_is_reset() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::in_dir(dir.path());
        fs::write(store.path(), "{truncated").unwrap();

        assert!(store.get("key").unwrap().is_none());
        assert_eq!(fs::read_to_string(store.path()).unwrap().trim(), "{}");

        store.set("key", "value").unwrap();
        assert_eq!(store.get("key").unwrap().as_deref(), Some("value"));
    }
}
