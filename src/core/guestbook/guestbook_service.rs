// Guestbook - visitors leave a name and a short message.
//
// Every entry goes through the submission gate before it is stored, so
// rate limiting and the content filter apply exactly as for any other write.

use crate::core::moderation::{SubmissionGate, SubmissionRejection};
use crate::core::storage::{load_json, save_json, KeyValueStore, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

const ENTRIES_KEY: &str = "guestbook:entries";

/// Oldest entries are dropped beyond this.
pub const MAX_STORED_ENTRIES: usize = 200;
pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_MESSAGE_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestbookEntry {
    pub id: String,
    pub name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum GuestbookError {
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Rejected(#[from] SubmissionRejection),

    #[error("Guestbook entry not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

pub struct GuestbookService {
    store: Arc<dyn KeyValueStore>,
    gate: Arc<SubmissionGate>,
    /// Serializes read-modify-write of the entry list within this process
    write_lock: Mutex<()>,
}

impl GuestbookService {
    pub fn new(store: Arc<dyn KeyValueStore>, gate: Arc<SubmissionGate>) -> Self {
        Self {
            store,
            gate,
            write_lock: Mutex::new(()),
        }
    }

    /// Add an entry after validation and moderation. Returns the stored entry.
    pub async fn sign(
        &self,
        client_id: &str,
        name: &str,
        message: &str,
    ) -> Result<GuestbookEntry, GuestbookError> {
        let name = name.trim();
        let message = message.trim();
        validate_length("Name", name, MAX_NAME_CHARS)?;
        validate_length("Message", message, MAX_MESSAGE_CHARS)?;

        let mut admitted = self.gate.admit(client_id, &[name, message])?.into_iter();
        let (Some(name), Some(message)) = (admitted.next(), admitted.next()) else {
            return Err(GuestbookError::Invalid("Submission was empty".to_string()));
        };

        let now = Utc::now();
        let entry = GuestbookEntry {
            id: format!("{}-{:08x}", now.timestamp_millis(), rand::random::<u32>()),
            name,
            message,
            created_at: now,
        };

        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_entries().await?;
        entries.insert(0, entry.clone());
        entries.truncate(MAX_STORED_ENTRIES);
        save_json(self.store.as_ref(), ENTRIES_KEY, &entries).await?;

        tracing::info!(entry_id = %entry.id, "Guestbook entry added");
        Ok(entry)
    }

    /// Newest entries first.
    pub async fn list(&self, limit: usize) -> Result<Vec<GuestbookEntry>, GuestbookError> {
        let mut entries = self.load_entries().await?;
        entries.truncate(limit);
        Ok(entries)
    }

    /// Moderation removal of a single entry.
    #[allow(dead_code)]
    pub async fn remove(&self, id: &str) -> Result<(), GuestbookError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_entries().await?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(GuestbookError::NotFound);
        }

        save_json(self.store.as_ref(), ENTRIES_KEY, &entries).await?;
        tracing::info!(entry_id = id, "Guestbook entry removed");
        Ok(())
    }

    async fn load_entries(&self) -> Result<Vec<GuestbookEntry>, GuestbookError> {
        Ok(load_json(self.store.as_ref(), ENTRIES_KEY)
            .await?
            .unwrap_or_default())
    }
}

fn validate_length(field: &str, value: &str, max: usize) -> Result<(), GuestbookError> {
    let len = value.chars().count();
    if len == 0 {
        return Err(GuestbookError::Invalid(format!("{} is required", field)));
    }
    if len > max {
        return Err(GuestbookError::Invalid(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::moderation::{
        ContentFilter, FilterConfig, OffensivePolicy, RateLimitConfig, SubmissionRateLimiter,
    };
    use crate::infra::storage::InMemoryKvStore;

    fn service(policy: OffensivePolicy) -> GuestbookService {
        let filter = ContentFilter::new(&FilterConfig::default()).unwrap();
        let limiter = SubmissionRateLimiter::new(RateLimitConfig::default());
        let gate = SubmissionGate::new(Arc::new(filter), Arc::new(limiter), policy);
        GuestbookService::new(Arc::new(InMemoryKvStore::new()), Arc::new(gate))
    }

    #[tokio::test]
    async fn test_sign_and_list_newest_first() {
        let service = service(OffensivePolicy::Reject);

        service.sign("1.1.1.1", "Alice", "First!").await.unwrap();
        service.sign("2.2.2.2", " Bob ", " Nice photos ").await.unwrap();

        let entries = service.list(10).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Bob");
        assert_eq!(entries[0].message, "Nice photos");
        assert_eq!(entries[1].name, "Alice");

        assert_eq!(service.list(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_validation() {
        let service = service(OffensivePolicy::Reject);

        assert!(matches!(
            service.sign("1.1.1.1", "   ", "hi").await,
            Err(GuestbookError::Invalid(_))
        ));
        let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(matches!(
            service.sign("1.1.1.1", "Alice", &long).await,
            Err(GuestbookError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_offensive_entry_rejected() {
        let service = service(OffensivePolicy::Reject);

        let result = service.sign("1.1.1.1", "nazi", "hello").await;

        assert!(matches!(
            result,
            Err(GuestbookError::Rejected(SubmissionRejection::OffensiveContent))
        ));
        assert!(service.list(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_offensive_entry_redacted() {
        let service = service(OffensivePolicy::Redact);

        let entry = service.sign("1.1.1.1", "Carol", "well shit").await.unwrap();

        assert_eq!(entry.message, "well ****");
    }

    #[tokio::test]
    async fn test_sixth_entry_in_an_hour_is_rate_limited() {
        let service = service(OffensivePolicy::Reject);

        for i in 0..5 {
            service
                .sign("1.1.1.1", "Dave", &format!("Message {}", i))
                .await
                .unwrap();
        }

        let result = service.sign("1.1.1.1", "Dave", "One too many").await;
        assert!(matches!(
            result,
            Err(GuestbookError::Rejected(SubmissionRejection::RateLimited))
        ));
    }

    #[tokio::test]
    async fn test_remove_entry() {
        let service = service(OffensivePolicy::Reject);
        let entry = service.sign("1.1.1.1", "Eve", "hello").await.unwrap();

        service.remove(&entry.id).await.unwrap();

        assert!(service.list(10).await.unwrap().is_empty());
        assert!(matches!(
            service.remove(&entry.id).await,
            Err(GuestbookError::NotFound)
        ));
    }
}
