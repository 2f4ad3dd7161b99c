use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;

/// Failures surfaced to HTTP clients.
///
/// Each variant renders as a JSON body with a stable `kind` so clients can
/// branch on it without parsing the message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Valid API Key required in X-API-Key header or Authorization Bearer token")]
    Unauthorized,

    #[error("Model \"{0}\" not found")]
    NotFound(String),

    #[error("Model file does not exist: {0}")]
    FileMissing(String),

    /// Carries the offending path for logs; the response does not echo it.
    #[error("Access denied: path outside the model directory")]
    Forbidden(String),

    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub kind: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) | ApiError::FileMissing(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "unauthorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::FileMissing(_) => "file_missing",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "Unauthorized",
            ApiError::NotFound(_) => "Not Found",
            ApiError::FileMissing(_) => "File Not Found",
            ApiError::Forbidden(_) => "Forbidden",
            ApiError::Internal(_) => "Internal Server Error",
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.label(),
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(message) => tracing::error!("Request failed: {}", message),
            ApiError::Forbidden(path) => tracing::warn!(path = %path, "Blocked path escape"),
            _ => {}
        }

        (self.status(), Json(self.body())).into_response()
    }
}

impl From<modelhub_core::Error> for ApiError {
    fn from(err: modelhub_core::Error) -> Self {
        match err {
            modelhub_core::Error::NotFound(id) => ApiError::NotFound(id),
            modelhub_core::Error::Forbidden(path) => ApiError::Forbidden(path),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(_: AuthError) -> Self {
        ApiError::Unauthorized
    }
}
