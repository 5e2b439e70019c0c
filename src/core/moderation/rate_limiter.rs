// Sliding-window rate limiter for user submissions.
//
// Each client identifier (usually an IP address) maps to the ascending list
// of its recent attempt timestamps in epoch milliseconds. Pruning is lazy:
// a client's list is trimmed only when that client submits again, plus an
// optional background sweep that drops clients who went quiet.

use super::moderation_models::RateLimitConfig;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Per-client sliding-window counter.
///
/// **DashMap:**
/// `entry()` holds the shard lock for the whole read-prune-append sequence,
/// so two concurrent submissions from the same client can't both observe a
/// stale count.
pub struct SubmissionRateLimiter {
    config: RateLimitConfig,
    /// Maps client id -> ascending attempt timestamps (epoch ms)
    log: DashMap<String, Vec<i64>>,
}

impl SubmissionRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            log: DashMap::new(),
        }
    }

    #[allow(dead_code)]
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn window_ms(&self) -> i64 {
        i64::try_from(self.config.window.as_millis()).unwrap_or(i64::MAX)
    }

    /// Check (and record) a submission attempt at the current wall-clock time.
    pub fn check_rate_limit(&self, client_id: &str) -> bool {
        self.check_rate_limit_at(client_id, Utc::now().timestamp_millis())
    }

    /// Check (and record) a submission attempt at `now_ms`.
    ///
    /// The attempt is recorded whether or not it is allowed; `allowed` is
    /// computed from the count before this attempt was appended.
    pub fn check_rate_limit_at(&self, client_id: &str, now_ms: i64) -> bool {
        if !self.log.contains_key(client_id) && self.log.len() >= self.config.max_tracked_clients
        {
            self.make_room(now_ms);
        }

        let window_ms = self.window_ms();
        let mut entry = self.log.entry(client_id.to_string()).or_default();
        let timestamps = entry.value_mut();

        timestamps.retain(|&t| now_ms.saturating_sub(t) < window_ms);
        let allowed = timestamps.len() < self.config.max_submissions as usize;

        // Keep the list ascending even if the wall clock stepped backwards.
        let stamp = timestamps.last().map_or(now_ms, |&last| last.max(now_ms));
        timestamps.push(stamp);

        allowed
    }

    /// Attempts still counted against a client at `now_ms`, without recording one.
    #[allow(dead_code)]
    pub fn recent_attempts(&self, client_id: &str, now_ms: i64) -> usize {
        let window_ms = self.window_ms();
        self.log
            .get(client_id)
            .map(|ts| {
                ts.iter()
                    .filter(|&&t| now_ms.saturating_sub(t) < window_ms)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Drop every client whose attempts all fall outside the window.
    /// Returns how many clients were removed.
    pub fn sweep_stale(&self, now_ms: i64) -> usize {
        let window_ms = self.window_ms();
        let before = self.log.len();
        self.log.retain(|_, timestamps| {
            timestamps
                .last()
                .is_some_and(|&last| now_ms.saturating_sub(last) < window_ms)
        });
        before.saturating_sub(self.log.len())
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.log.len()
    }

    /// Free a slot for a new client: sweep first, then evict the client
    /// whose most recent attempt is the oldest.
    fn make_room(&self, now_ms: i64) {
        self.sweep_stale(now_ms);
        if self.log.len() < self.config.max_tracked_clients {
            return;
        }

        let oldest = self
            .log
            .iter()
            .min_by_key(|entry| entry.value().last().copied().unwrap_or(i64::MIN))
            .map(|entry| entry.key().clone());

        if let Some(client_id) = oldest {
            tracing::debug!(client_id = %client_id, "Rate limiter full, evicting least recent client");
            self.log.remove(&client_id);
        }
    }

    /// Periodically sweep stale clients so the map can't grow without bound.
    pub fn spawn_sweeper(limiter: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let removed = limiter.sweep_stale(Utc::now().timestamp_millis());
                if removed > 0 {
                    tracing::debug!(
                        removed,
                        remaining = limiter.tracked_clients(),
                        "Swept stale rate limit entries"
                    );
                }
            }
        })
    }
}

impl Default for SubmissionRateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
