use std::collections::HashMap;
use std::sync::Mutex;

use chatline_types::error::StorageError;

use super::kv_store::KeyValueStorage;

/// Process-local [`KeyValueStorage`]. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with a single entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.insert(key, value);
        storage
    }

    fn insert(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    /// Remove every entry, as a user clearing site data would.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Read(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Write(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
