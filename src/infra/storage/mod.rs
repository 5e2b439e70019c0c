// Key-value backends and the code that picks one at startup.

pub mod in_memory;
pub mod json_store;
pub mod rest_store;
pub mod sqlite_store;

pub use in_memory::InMemoryKvStore;
pub use json_store::JsonFileKvStore;
pub use rest_store::RestKvStore;
pub use sqlite_store::SqliteKvStore;

use crate::config::{StorageBackend, StorageConfig};
use crate::core::storage::{FallbackStore, KeyValueStore};
use anyhow::Context;
use std::sync::Arc;

/// Build the configured store. Networked and database backends fall back to
/// the flat file when they fail.
pub async fn build_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match &config.backend {
        StorageBackend::Memory => Arc::new(InMemoryKvStore::new()),
        StorageBackend::File => Arc::new(open_fallback_file(config)?),
        StorageBackend::Rest { url, token } => {
            let primary = RestKvStore::new(url, token).context("Failed to create REST KV client")?;
            Arc::new(FallbackStore::new(primary, open_fallback_file(config)?))
        }
        StorageBackend::Sqlite { path } => {
            let primary = SqliteKvStore::new(path)
                .await
                .with_context(|| format!("Failed to open SQLite store at {}", path))?;
            Arc::new(FallbackStore::new(primary, open_fallback_file(config)?))
        }
    };

    tracing::info!(
        backend = store.name(),
        fallback_file = %config.fallback_file.display(),
        "Storage ready"
    );
    Ok(store)
}

fn open_fallback_file(config: &StorageConfig) -> anyhow::Result<JsonFileKvStore> {
    JsonFileKvStore::new(&config.fallback_file).with_context(|| {
        format!(
            "Failed to open fallback data file {}",
            config.fallback_file.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_backend_writes_to_fallback_file() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::File,
            fallback_file: dir.path().join("site_data.json"),
        };

        let store = build_store(&config).await.unwrap();
        store.set("k", json!(true)).await.unwrap();

        assert_eq!(store.name(), "json-file");
        assert!(config.fallback_file.exists());
    }

    #[tokio::test]
    async fn test_unreachable_rest_backend_falls_back_to_file() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::Rest {
                url: "http://127.0.0.1:9".to_string(),
                token: "token".to_string(),
            },
            fallback_file: dir.path().join("site_data.json"),
        };

        let store = build_store(&config).await.unwrap();
        store.set("likes:sunset", json!({"count": 1})).await.unwrap();

        assert_eq!(store.name(), "fallback");
        assert_eq!(
            store.get("likes:sunset").await.unwrap(),
            Some(json!({"count": 1}))
        );
        assert!(config.fallback_file.exists());
    }
}
