// Newsletter subscriptions - a deduplicated list of email addresses.

use crate::core::moderation::{OffensivePolicy, SubmissionGate, SubmissionRejection};
use crate::core::storage::{load_json, save_json, KeyValueStore, StoreError};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

const SUBSCRIBERS_KEY: &str = "newsletter:subscribers";
const MAX_EMAIL_LEN: usize = 254;
const EMAIL_PATTERN: &str = r"^[a-z0-9._%+\-]+@[a-z0-9\-]+(\.[a-z0-9\-]+)*\.[a-z]{2,}$";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Subscribed,
    AlreadySubscribed,
}

#[derive(Debug, Error)]
pub enum NewsletterError {
    #[error("Please provide a valid email address")]
    InvalidEmail,

    #[error(transparent)]
    Rejected(#[from] SubmissionRejection),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

pub struct NewsletterService {
    store: Arc<dyn KeyValueStore>,
    gate: Arc<SubmissionGate>,
    email_pattern: Regex,
    write_lock: Mutex<()>,
}

impl NewsletterService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        gate: Arc<SubmissionGate>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            store,
            gate,
            email_pattern: Regex::new(EMAIL_PATTERN)?,
            write_lock: Mutex::new(()),
        })
    }

    /// Normalize, validate, moderate and store an address.
    pub async fn subscribe(
        &self,
        client_id: &str,
        email: &str,
    ) -> Result<SubscribeOutcome, NewsletterError> {
        let email = email.trim().to_lowercase();
        if email.len() > MAX_EMAIL_LEN || !self.email_pattern.is_match(&email) {
            return Err(NewsletterError::InvalidEmail);
        }

        // Addresses are never redacted - a masked address is useless.
        self.gate
            .admit_with_policy(client_id, &[email.as_str()], OffensivePolicy::Reject)?;

        let _guard = self.write_lock.lock().await;
        let mut subscribers = self.load_subscribers().await?;
        if subscribers.iter().any(|s| s.email == email) {
            return Ok(SubscribeOutcome::AlreadySubscribed);
        }

        subscribers.push(Subscriber {
            email,
            subscribed_at: Utc::now(),
        });
        save_json(self.store.as_ref(), SUBSCRIBERS_KEY, &subscribers).await?;

        tracing::info!(total = subscribers.len(), "New newsletter subscriber");
        Ok(SubscribeOutcome::Subscribed)
    }

    #[allow(dead_code)]
    pub async fn subscriber_count(&self) -> Result<usize, NewsletterError> {
        Ok(self.load_subscribers().await?.len())
    }

    async fn load_subscribers(&self) -> Result<Vec<Subscriber>, NewsletterError> {
        Ok(load_json(self.store.as_ref(), SUBSCRIBERS_KEY)
            .await?
            .unwrap_or_default())
    }
}
