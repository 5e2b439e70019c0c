// Photo likes - one like per client per photo, toggled on repeat.

use crate::core::storage::{load_json, save_json, KeyValueStore, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

const MAX_PHOTO_ID_LEN: usize = 64;

/// What we persist per photo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LikeRecord {
    count: u64,
    clients: Vec<String>,
}

/// What callers see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikeState {
    pub photo_id: String,
    pub count: u64,
    /// Whether the requesting client currently likes the photo
    pub liked: bool,
}

#[derive(Debug, Error)]
pub enum LikesError {
    #[error("Invalid photo id")]
    InvalidPhotoId,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

pub struct LikesService {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl LikesService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Like the photo, or unlike it if this client already did.
    pub async fn toggle_like(
        &self,
        photo_id: &str,
        client_id: &str,
    ) -> Result<LikeState, LikesError> {
        validate_photo_id(photo_id)?;
        let key = likes_key(photo_id);

        let _guard = self.write_lock.lock().await;
        let mut record: LikeRecord = load_json(self.store.as_ref(), &key)
            .await?
            .unwrap_or_default();

        let liked = if let Some(pos) = record.clients.iter().position(|c| c == client_id) {
            record.clients.remove(pos);
            record.count = record.count.saturating_sub(1);
            false
        } else {
            record.clients.push(client_id.to_string());
            record.count = record.count.saturating_add(1);
            true
        };

        save_json(self.store.as_ref(), &key, &record).await?;
        tracing::debug!(photo_id, liked, count = record.count, "Photo like toggled");

        Ok(LikeState {
            photo_id: photo_id.to_string(),
            count: record.count,
            liked,
        })
    }

    /// Current like count for a photo, without changing anything.
    pub async fn get_likes(&self, photo_id: &str, client_id: &str) -> Result<LikeState, LikesError> {
        validate_photo_id(photo_id)?;
        let record: LikeRecord = load_json(self.store.as_ref(), &likes_key(photo_id))
            .await?
            .unwrap_or_default();

        Ok(LikeState {
            photo_id: photo_id.to_string(),
            count: record.count,
            liked: record.clients.iter().any(|c| c == client_id),
        })
    }
}

fn likes_key(photo_id: &str) -> String {
    format!("likes:{}", photo_id)
}

fn validate_photo_id(photo_id: &str) -> Result<(), LikesError> {
    let valid = !photo_id.is_empty()
        && photo_id.len() <= MAX_PHOTO_ID_LEN
        && photo_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(LikesError::InvalidPhotoId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::storage::InMemoryKvStore;

    fn service() -> LikesService {
        LikesService::new(Arc::new(InMemoryKvStore::new()))
    }

    #[tokio::test]
    async fn test_like_toggles() {
        let service = service();

        let state = service.toggle_like("sunset-01", "1.1.1.1").await.unwrap();
        assert_eq!(state.count, 1);
        assert!(state.liked);

        let state = service.toggle_like("sunset-01", "2.2.2.2").await.unwrap();
        assert_eq!(state.count, 2);

        let state = service.toggle_like("sunset-01", "1.1.1.1").await.unwrap();
        assert_eq!(state.count, 1);
        assert!(!state.liked);
    }

    #[tokio::test]
    async fn test_get_likes_is_read_only() {
        let service = service();
        service.toggle_like("mountain", "1.1.1.1").await.unwrap();

        let mine = service.get_likes("mountain", "1.1.1.1").await.unwrap();
        let theirs = service.get_likes("mountain", "9.9.9.9").await.unwrap();

        assert_eq!(mine.count, 1);
        assert!(mine.liked);
        assert!(!theirs.liked);
        assert_eq!(service.get_likes("unseen", "1.1.1.1").await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn test_photos_are_independent() {
        let service = service();
        service.toggle_like("a", "1.1.1.1").await.unwrap();

        assert_eq!(service.get_likes("b", "1.1.1.1").await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn test_invalid_photo_ids() {
        let service = service();
        let too_long = "x".repeat(MAX_PHOTO_ID_LEN + 1);

        for bad in ["", "../etc", "has space", "a:b", too_long.as_str()] {
            assert!(matches!(
                service.toggle_like(bad, "1.1.1.1").await,
                Err(LikesError::InvalidPhotoId)
            ));
        }
    }
}
