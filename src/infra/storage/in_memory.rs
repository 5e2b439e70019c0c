// In-memory implementation of KeyValueStore.
//
// Used for local development (STORAGE_BACKEND=memory) and in tests.
// Everything is lost when the process exits.

use crate::core::storage::{KeyValueStore, StoreError};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

/// **DashMap:**
/// A concurrent HashMap that's safe to use across multiple async tasks
/// without wrapping it in a Mutex.
pub struct InMemoryKvStore {
    data: DashMap<String, Value>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKvStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::{load_json, save_json};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u64,
    }

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryKvStore::new();

        // Initially, nothing is stored
        assert_eq!(store.get("likes:a").await.unwrap(), None);

        store.set("likes:a", Value::from(1)).await.unwrap();
        assert_eq!(store.get("likes:a").await.unwrap(), Some(Value::from(1)));

        store.delete("likes:a").await.unwrap();
        assert_eq!(store.get("likes:a").await.unwrap(), None);

        // Deleting again is fine
        store.delete("likes:a").await.unwrap();
    }

    #[tokio::test]
    async fn test_typed_helpers() {
        let store = InMemoryKvStore::new();

        save_json(&store, "counter", &Counter { count: 7 })
            .await
            .unwrap();
        let loaded: Option<Counter> = load_json(&store, "counter").await.unwrap();
        assert_eq!(loaded, Some(Counter { count: 7 }));

        let missing: Option<Counter> = load_json(&store, "nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_typed_helper_rejects_wrong_shape() {
        let store = InMemoryKvStore::new();
        store.set("counter", Value::from("not a counter")).await.unwrap();

        let result: Result<Option<Counter>, _> = load_json(&store, "counter").await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }
}
