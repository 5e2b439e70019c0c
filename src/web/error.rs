// Maps core errors onto HTTP responses.
//
// Body shape is always {"error": "..."}. Storage failures are logged here
// and never leak details to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::core::guestbook::GuestbookError;
use crate::core::likes::LikesError;
use crate::core::moderation::SubmissionRejection;
use crate::core::newsletter::NewsletterError;
use crate::core::storage::StoreError;
use crate::core::whiteboard::WhiteboardError;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn storage(error: StoreError) -> Self {
        tracing::error!("Storage error while handling request: {}", error);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong. Please try again later.",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<SubmissionRejection> for ApiError {
    fn from(rejection: SubmissionRejection) -> Self {
        let status = match rejection {
            SubmissionRejection::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            SubmissionRejection::OffensiveContent | SubmissionRejection::Spam => {
                StatusCode::BAD_REQUEST
            }
        };
        Self::new(status, rejection.to_string())
    }
}

impl From<GuestbookError> for ApiError {
    fn from(error: GuestbookError) -> Self {
        match error {
            GuestbookError::Invalid(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            GuestbookError::Rejected(rejection) => rejection.into(),
            GuestbookError::NotFound => Self::new(
                StatusCode::NOT_FOUND,
                GuestbookError::NotFound.to_string(),
            ),
            GuestbookError::Store(e) => Self::storage(e),
        }
    }
}

impl From<NewsletterError> for ApiError {
    fn from(error: NewsletterError) -> Self {
        match error {
            NewsletterError::InvalidEmail => Self::new(
                StatusCode::BAD_REQUEST,
                NewsletterError::InvalidEmail.to_string(),
            ),
            NewsletterError::Rejected(rejection) => rejection.into(),
            NewsletterError::Store(e) => Self::storage(e),
        }
    }
}

impl From<LikesError> for ApiError {
    fn from(error: LikesError) -> Self {
        match error {
            LikesError::InvalidPhotoId => Self::new(
                StatusCode::BAD_REQUEST,
                LikesError::InvalidPhotoId.to_string(),
            ),
            LikesError::Store(e) => Self::storage(e),
        }
    }
}

impl From<WhiteboardError> for ApiError {
    fn from(error: WhiteboardError) -> Self {
        match error {
            WhiteboardError::Invalid(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            WhiteboardError::RateLimited => Self::new(
                StatusCode::TOO_MANY_REQUESTS,
                WhiteboardError::RateLimited.to_string(),
            ),
            WhiteboardError::Store(e) => Self::storage(e),
        }
    }
}
