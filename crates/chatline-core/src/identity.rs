//! Per-device user identity.
//!
//! `IdentityStore` resolves the user id sent with every turn: it reads the id
//! persisted in device storage, or generates and persists a fresh one. Once
//! resolved, the id is served from memory for the rest of the process.
//!
//! Storage failures never reach the caller. They are logged and the session
//! continues with the in-memory id.

use rand::Rng;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use chatline_types::chat::ClientIdentity;
use chatline_types::config::IdentityConfig;

use crate::storage::kv_store::KeyValueStorage;

/// Characters used for the random suffix of generated ids.
const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Resolves and persists the per-device user id.
pub struct IdentityStore<S: KeyValueStorage> {
    storage: S,
    config: IdentityConfig,
    user_id: OnceCell<String>,
}

impl<S: KeyValueStorage> IdentityStore<S> {
    pub fn new(storage: S, config: IdentityConfig) -> Self {
        Self {
            storage,
            config,
            user_id: OnceCell::new(),
        }
    }

    /// Access the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Return the persisted user id, generating and persisting one if absent.
    ///
    /// Storage is consulted only on the first call; later calls return the
    /// cached value.
    pub async fn get_or_create_user_id(&self) -> String {
        self.user_id
            .get_or_init(|| self.resolve())
            .await
            .clone()
    }

    /// Resolve the identity and write it back to storage.
    ///
    /// Called once when the client starts. The write is unconditional so the
    /// id survives storage being cleared after it was first generated.
    pub async fn mount(&self) -> ClientIdentity {
        let user_id = self.get_or_create_user_id().await;
        self.persist(&user_id).await;
        ClientIdentity { user_id }
    }

    async fn resolve(&self) -> String {
        let key = &self.config.storage_key;
        match self.storage.get(key).await {
            Ok(Some(stored)) if !stored.trim().is_empty() => {
                debug!(key = %key, "Loaded persisted user id");
                return stored;
            }
            Ok(Some(_)) => warn!(key = %key, "Persisted user id is blank, generating a new one"),
            Ok(None) => {}
            Err(e) => warn!(key = %key, error = %e, "Failed to read persisted user id"),
        }

        let user_id = generate_user_id(&self.config.prefix, self.config.suffix_len);
        self.persist(&user_id).await;
        info!(user_id = %user_id, "Generated new user id");
        user_id
    }

    async fn persist(&self, user_id: &str) {
        if let Err(e) = self.storage.set(&self.config.storage_key, user_id).await {
            warn!(error = %e, "Failed to persist user id, continuing with in-memory id");
        }
    }
}

/// Generate `prefix` followed by `suffix_len` random `[0-9a-z]` characters.
///
/// The suffix is at least one character long, so the id is never empty.
pub fn generate_user_id(prefix: &str, suffix_len: usize) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..suffix_len.max(1))
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("{prefix}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;
    use chatline_types::error::StorageError;

    fn is_generated_id(id: &str) -> bool {
        id.strip_prefix("user-").is_some_and(|suffix| {
            suffix.len() == 8
                && suffix
                    .chars()
                    .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        })
    }

    /// Storage whose every operation fails.
    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Read("disk unavailable".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write("disk unavailable".to_string()))
        }
    }

    #[test]
    fn test_generate_user_id_format() {
        for _ in 0..50 {
            assert!(is_generated_id(&generate_user_id("user-", 8)));
        }
    }

    #[test]
    fn test_generate_user_id_never_empty() {
        let id = generate_user_id("", 0);
        assert_eq!(id.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_storage_generates_and_persists() {
        let store = IdentityStore::new(MemoryStorage::new(), IdentityConfig::default());
        let id = store.get_or_create_user_id().await;

        assert!(is_generated_id(&id), "unexpected id format: {id}");
        let stored = store.storage().get("user_id").await.unwrap();
        assert_eq!(stored.as_deref(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn test_existing_id_is_reused() {
        let storage = MemoryStorage::with_entry("user_id", "user-persist1");
        let store = IdentityStore::new(storage, IdentityConfig::default());
        assert_eq!(store.get_or_create_user_id().await, "user-persist1");
    }

    #[tokio::test]
    async fn test_getter_is_stable_within_process() {
        let store = IdentityStore::new(MemoryStorage::new(), IdentityConfig::default());
        let first = store.get_or_create_user_id().await;
        let second = store.get_or_create_user_id().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_blank_stored_value_is_replaced() {
        let storage = MemoryStorage::with_entry("user_id", "   ");
        let store = IdentityStore::new(storage, IdentityConfig::default());
        let id = store.get_or_create_user_id().await;
        assert!(is_generated_id(&id));
    }

    #[tokio::test]
    async fn test_mount_rewrites_cleared_storage() {
        let store = IdentityStore::new(MemoryStorage::new(), IdentityConfig::default());
        let id = store.get_or_create_user_id().await;

        store.storage().clear();
        let identity = store.mount().await;

        assert_eq!(identity.user_id, id);
        let stored = store.storage().get("user_id").await.unwrap();
        assert_eq!(stored.as_deref(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn test_storage_failure_is_not_fatal() {
        let store = IdentityStore::new(BrokenStorage, IdentityConfig::default());
        let identity = store.mount().await;
        assert!(is_generated_id(&identity.user_id));
        assert_eq!(store.get_or_create_user_id().await, identity.user_id);
    }

    #[tokio::test]
    async fn test_custom_prefix_and_key() {
        let config = IdentityConfig {
            storage_key: "device".to_string(),
            prefix: "dev-".to_string(),
            suffix_len: 4,
        };
        let store = IdentityStore::new(MemoryStorage::new(), config);
        let id = store.get_or_create_user_id().await;
        assert!(id.starts_with("dev-"));
        assert_eq!(id.len(), 8);
        assert!(store.storage().get("device").await.unwrap().is_some());
    }
}
