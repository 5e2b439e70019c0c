// Collaborative whiteboard - everyone draws on the same board.
//
// Strokes are validated and rate limited per client, then appended to a
// capped list. The limiter is a separate instance from the submission gate's
// because drawing is far chattier than signing the guestbook.

use super::whiteboard_models::{StoredStroke, Stroke};
use crate::core::moderation::SubmissionRateLimiter;
use crate::core::storage::{load_json, save_json, KeyValueStore, StoreError};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

const STROKES_KEY: &str = "whiteboard:strokes";

/// Oldest strokes are dropped beyond this.
pub const MAX_STORED_STROKES: usize = 1_000;

#[derive(Debug, Error)]
pub enum WhiteboardError {
    #[error("{0}")]
    Invalid(String),

    #[error("Too many strokes. Please slow down.")]
    RateLimited,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

pub struct WhiteboardService {
    store: Arc<dyn KeyValueStore>,
    limiter: Arc<SubmissionRateLimiter>,
    write_lock: Mutex<()>,
}

impl WhiteboardService {
    pub fn new(store: Arc<dyn KeyValueStore>, limiter: Arc<SubmissionRateLimiter>) -> Self {
        Self {
            store,
            limiter,
            write_lock: Mutex::new(()),
        }
    }

    /// Append a stroke. Returns how many strokes the board now holds.
    pub async fn add_stroke(&self, client_id: &str, stroke: Stroke) -> Result<usize, WhiteboardError> {
        stroke.validate().map_err(WhiteboardError::Invalid)?;

        if !self.limiter.check_rate_limit(client_id) {
            tracing::info!(client_id, "Whiteboard stroke rejected: rate limited");
            return Err(WhiteboardError::RateLimited);
        }

        let now = Utc::now();
        let stored = StoredStroke {
            id: format!("{}-{:08x}", now.timestamp_millis(), rand::random::<u32>()),
            stroke,
            created_at: now,
        };

        let _guard = self.write_lock.lock().await;
        let mut strokes = self.strokes().await?;
        strokes.push(stored);
        if strokes.len() > MAX_STORED_STROKES {
            let excess = strokes.len() - MAX_STORED_STROKES;
            strokes.drain(..excess);
        }
        save_json(self.store.as_ref(), STROKES_KEY, &strokes).await?;

        Ok(strokes.len())
    }

    /// Every stroke on the board, oldest first (drawing order).
    pub async fn strokes(&self) -> Result<Vec<StoredStroke>, WhiteboardError> {
        Ok(load_json(self.store.as_ref(), STROKES_KEY)
            .await?
            .unwrap_or_default())
    }
}
