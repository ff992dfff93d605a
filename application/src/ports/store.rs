//! Key-value store port
//!
//! A small persistent JSON document used by the translation cache and the
//! query cache. Every write replaces the stored value for its key; callers
//! treat errors as a miss (read) or a dropped write.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt store document: {0}")]
    Corrupt(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store lock poisoned")]
    Poisoned,
}

pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError>;

    fn write(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove every entry
    fn clear(&self) -> Result<(), StoreError>;

    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

/// Volatile store for tests and when persistence is disabled
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_then_read() {
        let store = MemoryStore::new();
        store.write("k", json!({"a": 1})).unwrap();
        assert_eq!(store.read("k").unwrap(), Some(json!({"a": 1})));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_clear_removes_everything() {
        let store = MemoryStore::new();
        store.write("k", json!(1)).unwrap();
        store.clear().unwrap();
        assert_eq!(store.read("k").unwrap(), None);
        assert!(store.is_empty().unwrap());
    }
}
