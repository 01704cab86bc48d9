//! Key-value store trait.
//!
//! The client's durable device storage: a flat map of string keys to string
//! values that outlives the process. Implementations live in chatline-infra.

use chatline_types::error::StorageError;

/// Trait for device-scoped durable key/value storage.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait KeyValueStorage: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Set a value for a key (upsert).
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;
}
