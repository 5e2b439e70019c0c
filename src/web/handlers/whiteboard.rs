// GET  /api/whiteboard - every stroke on the board
// POST /api/whiteboard - draw a stroke

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::whiteboard::Stroke;
use crate::web::client::ClientId;
use crate::web::error::ApiError;
use crate::web::AppState;

pub async fn get_strokes(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let strokes = state.whiteboard.strokes().await?;
    Ok(Json(json!({ "strokes": strokes })))
}

pub async fn add_stroke(
    State(state): State<AppState>,
    client: ClientId,
    Json(stroke): Json<Stroke>,
) -> Result<impl IntoResponse, ApiError> {
    let count = state.whiteboard.add_stroke(client.as_str(), stroke).await?;
    Ok((StatusCode::CREATED, Json(json!({ "count": count }))))
}
