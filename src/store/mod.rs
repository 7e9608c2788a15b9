//! Session Persistence
//!
//! The persisted wallet record lives in a key/value store shaped like the
//! browser's `localStorage`. [`SessionStore`] is the only writer.
//!
//! ## Backends
//!
//! - [`MemoryStore`]: in-process map, used in tests
//! - [`FileStore`]: JSON file in the data directory (native only)
//! - `LocalStorage`: `window.localStorage` (dashboard crate)

#[cfg(feature = "native")]
mod file;

#[cfg(feature = "native")]
pub use file::FileStore;

use std::cell::RefCell;
use std::collections::HashMap;
use thiserror::Error;

use crate::wallet::SessionProjection;

/// Key of the persisted wallet record
pub const SESSION_KEY: &str = "adalend.wallet";

/// Errors from a key/value backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backend cannot be reached (storage disabled, quota exceeded, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// String key/value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

/// Reads and writes the persisted wallet projection
pub struct SessionStore<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, SESSION_KEY)
    }

    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Load the persisted projection.
    ///
    /// A record that no longer parses is removed and reported as absent.
    pub fn load(&self) -> StoreResult<Option<SessionProjection>> {
        let raw = match self.backend.get(&self.key)? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        match serde_json::from_str::<SessionProjection>(&raw) {
            Ok(projection) if projection.connected => Ok(Some(projection)),
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Discarding unreadable wallet record");
                self.backend.remove(&self.key)?;
                Ok(None)
            }
        }
    }

    pub fn save(&self, projection: &SessionProjection) -> StoreResult<()> {
        let raw = serde_json::to_string(projection)?;
        self.backend.set(&self.key, &raw)
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.backend.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> SessionProjection {
        SessionProjection {
            connected: true,
            address: Some("addr1q9ld7tzqxyzabc0123456789lmnop7tzq".to_string()),
            display_address: "addr1q...op7tzq".to_string(),
            display_balance: "12.50".to_string(),
            name: "nami".to_string(),
        }
    }

    #[test]
    fn test_save_load_clear() {
        let store = SessionStore::new(MemoryStore::new());
        assert!(store.load().unwrap().is_none());

        store.save(&projection()).unwrap();
        assert_eq!(store.load().unwrap(), Some(projection()));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        assert!(store.backend().is_empty());
    }

    #[test]
    fn test_record_uses_fixed_key_and_camel_case() {
        let backend = MemoryStore::new();
        let store = SessionStore::new(&backend);
        store.save(&projection()).unwrap();

        let raw = backend.get(SESSION_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["displayAddress"], "addr1q...op7tzq");
        assert_eq!(value["displayBalance"], "12.50");
        assert_eq!(value["connected"], true);
    }

    #[test]
    fn test_corrupt_record_is_discarded() {
        let backend = MemoryStore::new();
        backend.set(SESSION_KEY, "{not json").unwrap();

        let store = SessionStore::new(&backend);
        assert!(store.load().unwrap().is_none());
        assert!(backend.get(SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn test_disconnected_record_is_absent() {
        let backend = MemoryStore::new();
        let mut record = projection();
        record.connected = false;
        backend
            .set(SESSION_KEY, &serde_json::to_string(&record).unwrap())
            .unwrap();

        let store = SessionStore::new(&backend);
        assert!(store.load().unwrap().is_none());
    }
}
