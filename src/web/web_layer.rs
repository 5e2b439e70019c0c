// Web layer - the site's API routes on top of the core services.
//
// All routes serve JSON. Page rendering lives elsewhere; this process only
// handles the small persistence-backed features.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::guestbook::GuestbookService;
use crate::core::likes::LikesService;
use crate::core::newsletter::NewsletterService;
use crate::core::whiteboard::WhiteboardService;

pub mod client;
pub mod error;
pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub guestbook: Arc<GuestbookService>,
    pub newsletter: Arc<NewsletterService>,
    pub likes: Arc<LikesService>,
    pub whiteboard: Arc<WhiteboardService>,
}

/// Start the Axum server and block until it exits.
pub async fn run_server(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("Site API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    // Connect info lets handlers fall back to the peer address
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/api/guestbook",
            get(handlers::guestbook::list_entries).post(handlers::guestbook::sign),
        )
        .route(
            "/api/subscribe",
            axum::routing::post(handlers::newsletter::subscribe),
        )
        .route(
            "/api/likes/{photo_id}",
            get(handlers::likes::get_likes).post(handlers::likes::toggle_like),
        )
        .route(
            "/api/whiteboard",
            get(handlers::whiteboard::get_strokes).post(handlers::whiteboard::add_stroke),
        );

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
