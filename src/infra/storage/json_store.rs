// Flat-file key-value store. The whole store is one JSON object on disk:
// { "guestbook:entries": [...], "likes:sunset": {...}, ... }
//
// This is the fallback backend, so it has to work with nothing but a
// writable directory.

use crate::core::storage::{KeyValueStore, StoreError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::RwLock;

pub struct JsonFileKvStore {
    path: PathBuf,
    cache: RwLock<Map<String, Value>>,
}

impl JsonFileKvStore {
    /// Open (or lazily create) the store at `path`. A missing file is an empty store.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let cache = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                Map::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            Map::new()
        };

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// Write the whole map to disk. The caller holds the write lock so
    /// concurrent mutations can't persist out of order, and only swaps the
    /// new map into the cache once this succeeds.
    async fn persist(&self, snapshot: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let text = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, text).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileKvStore {
    fn name(&self) -> &'static str {
        "json-file"
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let cache = self.cache.read().await;
        Ok(cache.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut cache = self.cache.write().await;
        let mut next = cache.clone();
        next.insert(key.to_string(), value);
        self.persist(&next).await?;
        *cache = next;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut cache = self.cache.write().await;
        if !cache.contains_key(key) {
            return Ok(());
        }
        let mut next = cache.clone();
        next.remove(key);
        self.persist(&next).await?;
        *cache = next;
        Ok(())
    }
}
