use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::identity::IdentityError;
use crate::llm_client::LlmError;
use crate::store::StoreError;

/// Client-facing message for unparsable question output.
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse AI response as JSON array.";
const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as `{"success": false, "error": <message>}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to parse model response: {0}")]
    ResponseParse(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            // Logged with the raw model text where the parse failed.
            AppError::ResponseParse(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                PARSE_FAILURE_MESSAGE.to_string(),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
            AppError::Identity(e) => {
                tracing::error!("Identity error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}
