//! JSON-file device storage.
//!
//! `JsonFileStorage` implements [`KeyValueStorage`] over a single JSON object
//! file of string keys to string values, the client's equivalent of browser
//! local storage.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tokio::sync::Mutex;

use chatline_core::storage::kv_store::KeyValueStorage;
use chatline_types::error::StorageError;

use super::{read_optional, write_atomic};

/// File-backed [`KeyValueStorage`].
///
/// Writes are serialized through a mutex so concurrent `set` calls cannot
/// lose each other's keys.
pub struct JsonFileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = read_optional(&self.path)
            .await
            .map_err(|e| StorageError::Read(format!("{}: {e}", self.path.display())))?;

        match content {
            Some(content) if !content.trim().is_empty() => serde_json::from_str(&content)
                .map_err(|e| StorageError::Corrupt(format!("{}: {e}", self.path.display()))),
            _ => Ok(BTreeMap::new()),
        }
    }
}

impl KeyValueStorage for JsonFileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut map = self.read_map().await?;
        Ok(map.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;

        let mut map = match self.read_map().await {
            Ok(map) => map,
            Err(StorageError::Corrupt(detail)) => {
                tracing::warn!(%detail, "Device storage is corrupt, starting fresh");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };

        if map.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        map.insert(key.to_string(), value.to_string());

        let content = serde_json::to_string_pretty(&map)
            .map_err(|e| StorageError::Write(e.to_string()))?;
        write_atomic(&self.path, &content)
            .await
            .map_err(|e| StorageError::Write(format!("{}: {e}", self.path.display())))
    }
}
