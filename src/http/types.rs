use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::domain::error::TodoError;

#[derive(Debug, Serialize)]
pub struct ErrorBody { pub message: String }

#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self { Self { status, message: message.into() } }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::Unauthorized => Self::new(StatusCode::UNAUTHORIZED, err.to_string()),
            TodoError::Validation(message) => Self::new(StatusCode::BAD_REQUEST, message),
            TodoError::NotFound => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            // Already logged by the service; the cause stays server-side.
            TodoError::Internal(_) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "rejected request body");
        Self::new(StatusCode::BAD_REQUEST, "Invalid request body")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response { (self.status, axum::Json(ErrorBody { message: self.message })).into_response() }
}
