// GET  /api/likes/{photo_id} - current count
// POST /api/likes/{photo_id} - like / unlike

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::web::client::ClientId;
use crate::web::error::ApiError;
use crate::web::AppState;

pub async fn get_likes(
    State(state): State<AppState>,
    client: ClientId,
    Path(photo_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let likes = state.likes.get_likes(&photo_id, client.as_str()).await?;
    Ok(Json(likes))
}

pub async fn toggle_like(
    State(state): State<AppState>,
    client: ClientId,
    Path(photo_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let likes = state.likes.toggle_like(&photo_id, client.as_str()).await?;
    Ok(Json(likes))
}
