//! In-memory KeyValueStore implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::storage::{KeyValueStore, Result, StorageError};

/// In-memory implementation of [`KeyValueStore`].
///
/// Nothing survives the process; used by tests and ephemeral sessions.
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove_round_trip() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("save").unwrap(), None);

        store.set("save", "{}").unwrap();
        assert_eq!(store.get("save").unwrap().as_deref(), Some("{}"));

        store.set("save", "{\"v\":2}").unwrap();
        assert_eq!(store.get("save").unwrap().as_deref(), Some("{\"v\":2}"));

        store.remove("save").unwrap();
        assert_eq!(store.get("save").unwrap(), None);
    }

    #[test]
    fn removing_absent_key_is_ok() {
        let store = InMemoryStore::new();
        store.remove("missing").unwrap();
    }
}
