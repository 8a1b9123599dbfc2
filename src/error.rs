use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed JSON body: {0}")]
    Json(#[from] JsonRejection),

    #[error("Malformed query string: {0}")]
    Query(#[from] QueryRejection),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Json(rejection) => (rejection.status(), rejection.body_text()),
            AppError::Query(rejection) => (rejection.status(), rejection.body_text()),
        };

        tracing::debug!(status = %status, error = %message, "Rejecting request");

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
