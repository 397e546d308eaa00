use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use relance_engine::EngineError;
use relance_sweeps::error::SweepError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Forbidden(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                // Patient-facing failures never leak internal detail.
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Validation(msg) => ApiError::BadRequest(msg),
            EngineError::NotFound => {
                ApiError::NotFound("questionnaire not found or expired".to_string())
            }
            // Same HTTP shape as not-found, but the message differs — the
            // patient UI branches on it.
            EngineError::AlreadyCompleted => {
                ApiError::NotFound("this questionnaire has already been completed".to_string())
            }
            EngineError::Forbidden => {
                ApiError::Forbidden("questionnaire belongs to another practitioner".to_string())
            }
            EngineError::Storage(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<SweepError> for ApiError {
    fn from(e: SweepError) -> Self {
        ApiError::Internal(e.to_string())
    }
}
