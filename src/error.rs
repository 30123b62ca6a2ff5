use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: guests or partyDetails.";
pub const INVALID_JSON_MESSAGE: &str = "Request body must be valid JSON.";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method Not Allowed. Use POST.";

/// Custom error type for the application
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    MethodNotAllowed,
    /// Upstream call or response parsing failed
    Generation { error: String, details: String },
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                METHOD_NOT_ALLOWED_MESSAGE.to_string(),
                None,
            ),
            AppError::Generation { error, details } => {
                error!("Generation failed: {} ({})", error, details);
                (StatusCode::INTERNAL_SERVER_ERROR, error, Some(details))
            }
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

/// Result type for application handlers
pub type AppResult<T> = Result<T, AppError>;
