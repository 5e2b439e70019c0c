// Fallback store - try the primary backend, fall back to the secondary.
//
// The site runs against a managed key-value store when one is configured and
// keeps a flat file around for when it isn't reachable. Keeping the policy in
// one wrapper means the services never branch on which backend answered.

use super::kv_store::{KeyValueStore, StoreError};
use async_trait::async_trait;
use serde_json::Value;

pub struct FallbackStore<P: KeyValueStore, S: KeyValueStore> {
    primary: P,
    secondary: S,
}

impl<P: KeyValueStore, S: KeyValueStore> FallbackStore<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    fn log_fallback(&self, operation: &str, key: &str, error: &StoreError) {
        tracing::warn!(
            primary = self.primary.name(),
            secondary = self.secondary.name(),
            operation,
            key,
            "Primary store failed, falling back: {}",
            error
        );
    }
}

#[async_trait]
impl<P: KeyValueStore, S: KeyValueStore> KeyValueStore for FallbackStore<P, S> {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        match self.primary.get(key).await {
            Ok(value) => Ok(value),
            Err(e) => {
                self.log_fallback("get", key, &e);
                self.secondary.get(key).await
            }
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        match self.primary.set(key, value.clone()).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.log_fallback("set", key, &e);
                self.secondary.set(key, value).await
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        match self.primary.delete(key).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.log_fallback("delete", key, &e);
                self.secondary.delete(key).await
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
