// GET  /api/guestbook?limit=N - newest entries first
// POST /api/guestbook         - sign the guestbook

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::guestbook::MAX_STORED_ENTRIES;
use crate::web::client::ClientId;
use crate::web::error::ApiError;
use crate::web::AppState;

const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SignRequest {
    pub name: String,
    pub message: String,
}

pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIMIT)
        .clamp(1, MAX_STORED_ENTRIES);
    let entries = state.guestbook.list(limit).await?;
    Ok(Json(json!({ "entries": entries })))
}

pub async fn sign(
    State(state): State<AppState>,
    client: ClientId,
    Json(request): Json<SignRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .guestbook
        .sign(client.as_str(), &request.name, &request.message)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
