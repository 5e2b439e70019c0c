// This is the entry point of the site's API server.
//
// **Architecture Overview:**
// - `core/` = Business logic (moderation, storage port, site features)
// - `infra/` = Implementations of core traits (storage backends)
// - `web/` = HTTP adapters (routes, handlers, error mapping)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Start background upkeep
// 4. Serve the API routes

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
mod config;
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;
#[path = "web/web_layer.rs"]
mod web;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::core::guestbook::GuestbookService;
use crate::core::likes::LikesService;
use crate::core::moderation::{
    ContentFilter, RateLimitConfig, SubmissionGate, SubmissionRateLimiter,
};
use crate::core::newsletter::NewsletterService;
use crate::core::whiteboard::WhiteboardService;
use crate::web::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    let store = infra::storage::build_store(&config.storage).await?;

    let filter =
        Arc::new(ContentFilter::new(&config.filter).context("Failed to build content filter")?);

    // Guestbook and newsletter share one quota per visitor
    let submission_limiter = Arc::new(SubmissionRateLimiter::new(RateLimitConfig {
        max_submissions: config.submissions_per_hour,
        max_tracked_clients: config.max_tracked_clients,
        ..Default::default()
    }));
    let gate = Arc::new(SubmissionGate::new(
        filter,
        submission_limiter.clone(),
        config.offensive_policy,
    ));

    let whiteboard_limiter = Arc::new(SubmissionRateLimiter::new(RateLimitConfig {
        max_submissions: config.whiteboard_strokes_per_hour,
        max_tracked_clients: config.max_tracked_clients,
        ..Default::default()
    }));

    let state = AppState {
        guestbook: Arc::new(GuestbookService::new(store.clone(), gate.clone())),
        newsletter: Arc::new(
            NewsletterService::new(store.clone(), gate)
                .context("Failed to build newsletter service")?,
        ),
        likes: Arc::new(LikesService::new(store.clone())),
        whiteboard: Arc::new(WhiteboardService::new(store, whiteboard_limiter.clone())),
    };

    // Keep the rate limiter maps from growing forever
    SubmissionRateLimiter::spawn_sweeper(submission_limiter, config.sweep_interval);
    SubmissionRateLimiter::spawn_sweeper(whiteboard_limiter, config.sweep_interval);

    tracing::info!(
        policy = ?config.offensive_policy,
        submissions_per_hour = config.submissions_per_hour,
        "Moderation ready"
    );

    web::run_server(state, &config.bind_addr, config.port).await
}
