// POST /api/subscribe - add an address to the newsletter list

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::newsletter::SubscribeOutcome;
use crate::web::client::ClientId;
use crate::web::error::ApiError;
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

pub async fn subscribe(
    State(state): State<AppState>,
    client: ClientId,
    Json(request): Json<SubscribeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .newsletter
        .subscribe(client.as_str(), &request.email)
        .await?;

    let response = match outcome {
        SubscribeOutcome::Subscribed => (
            StatusCode::CREATED,
            Json(json!({ "status": "subscribed" })),
        ),
        SubscribeOutcome::AlreadySubscribed => (
            StatusCode::OK,
            Json(json!({ "status": "already_subscribed" })),
        ),
    };
    Ok(response)
}
