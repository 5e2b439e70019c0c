// The storage port. Every persistence-backed feature talks to a
// KeyValueStore and never to a concrete backend.
//
// The core defines WHAT it needs, the infra layer decides HOW (managed REST
// store, SQLite, a JSON file, or plain memory).

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Minimal key-value contract shared by all backends.
///
/// Values are JSON documents so each feature can keep its own shape.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Read a value. `Ok(None)` means the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Write (or overwrite) a value.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove a key. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Read and deserialize a typed value.
pub async fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Serialize and write a typed value.
pub async fn save_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    store.set(key, serde_json::to_value(value)?).await
}

// Lets the composition root pick a backend at runtime.
#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key).await
    }
}
