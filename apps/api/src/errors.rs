use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The generation service answered, but with content that cannot be
    /// coerced into the shape the interpretation stage needs.
    #[error("Schema error: {0}")]
    Schema(String),

    /// The generation service could not be reached or refused the call.
    #[error("Gateway error: {0}")]
    Gateway(#[from] LlmError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Schema(msg) => {
                tracing::warn!("Schema error: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "SCHEMA_ERROR",
                    "Could not understand the query. Please rephrase and try again.".to_string(),
                )
            }
            AppError::Gateway(e) => {
                tracing::error!("Gateway error: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "GATEWAY_ERROR",
                    "AI service is temporarily unavailable. Please try again later.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
