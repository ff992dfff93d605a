//! JSON document store
//!
//! The whole store is one JSON object on disk. Every write rewrites the
//! document through a temporary file and a rename, under the same lock
//! that guards the in-memory map, so concurrent writers cannot lose updates.
//! The map only changes once the document is on disk.

use demeter_application::ports::store::{KeyValueStore, StoreError};
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

type Entries = IndexMap<String, Value>;

/// Key-value store persisted as a single JSON document
pub struct JsonFileStore {
    path: PathBuf,
    /// When exceeded, only the most recently written half is kept
    max_entries: Option<usize>,
    entries: Mutex<Entries>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file is an empty store. An unreadable document is logged and
    /// replaced on the next write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Entries::new(),
            Ok(text) => match serde_json::from_str::<Entries>(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring corrupt store {}: {}", path.display(), e);
                    Entries::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Entries::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), entries = entries.len(), "Store opened");

        Ok(Self {
            path,
            max_entries: None,
            entries: Mutex::new(entries),
        })
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries.max(1));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Entries>, StoreError> {
        self.entries.lock().map_err(|_| StoreError::Poisoned)
    }

    fn persist(&self, entries: &Entries) -> Result<(), StoreError> {
        let document = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, document)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        let mut next = entries.clone();
        // Rewritten keys count as the newest
        next.shift_remove(key);
        next.insert(key.to_string(), value);

        if let Some(max) = self.max_entries
            && next.len() > max
        {
            let keep = max / 2;
            let evicted = next.len() - keep;
            next.drain(..evicted);
            debug!(evicted, kept = next.len(), "Store evicted oldest entries");
        }

        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        self.persist(&Entries::new())?;
        entries.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("cache.json")).unwrap();

        store.write("en:es:hello", json!("hola")).unwrap();
        assert_eq!(store.read("en:es:hello").unwrap(), Some(json!("hola")));
        assert_eq!(store.read("missing").unwrap(), None);
    }

    #[test]
    fn test_clear_then_read_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let store = JsonFileStore::open(&path).unwrap();

        store.write("k", json!({"v": 1})).unwrap();
        store.clear().unwrap();

        assert_eq!(store.read("k").unwrap(), None);
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "{}");
    }

    #[test]
    fn test_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        JsonFileStore::open(&path)
            .unwrap()
            .write("response:x", json!([1, 2]))
            .unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.read("response:x").unwrap(), Some(json!([1, 2])));
        assert_eq!(reopened.len().unwrap(), 1);
    }

    #[test]
    fn test_corrupt_document_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.is_empty().unwrap());
        store.write("k", json!(1)).unwrap();
        assert_eq!(JsonFileStore::open(&path).unwrap().len().unwrap(), 1);
    }

    #[test]
    fn test_eviction_keeps_newest_half() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("cache.json"))
            .unwrap()
            .with_max_entries(4);

        for i in 0..5 {
            store.write(&format!("k{}", i), json!(i)).unwrap();
        }

        assert_eq!(store.len().unwrap(), 2);
        assert_eq!(store.read("k0").unwrap(), None);
        assert_eq!(store.read("k3").unwrap(), Some(json!(3)));
        assert_eq!(store.read("k4").unwrap(), Some(json!(4)));
    }

    #[test]
    fn test_rewritten_key_counts_as_newest() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("cache.json"))
            .unwrap()
            .with_max_entries(4);

        for (i, key) in ["a", "b", "c", "d"].iter().enumerate() {
            store.write(key, json!(i)).unwrap();
        }
        store.write("a", json!(10)).unwrap();
        store.write("e", json!(5)).unwrap();

        assert_eq!(store.read("a").unwrap(), Some(json!(10)));
        assert_eq!(store.read("b").unwrap(), None);
    }

    #[test]
    fn test_concurrent_writers_lose_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let store = std::sync::Arc::new(JsonFileStore::open(&path).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..10 {
                        store.write(&format!("t{}-{}", t, i), json!(i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(JsonFileStore::open(&path).unwrap().len().unwrap(), 80);
    }

    #[test]
    fn test_failed_persist_leaves_entries_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.write("kept", json!(1)).unwrap();

        // A non-empty directory in place of the document makes the rename fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        fs::write(path.join("blocker"), "x").unwrap();

        assert!(store.write("lost", json!(2)).is_err());
        assert_eq!(store.read("lost").unwrap(), None);
        assert_eq!(store.read("kept").unwrap(), Some(json!(1)));

        assert!(store.clear().is_err());
        assert_eq!(store.len().unwrap(), 1);
    }
}
