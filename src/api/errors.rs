use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::errors::DomainError;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    status: u16,
    error: String,
    message: String,
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    NotFound(String),
    TooManyRequests(&'static str),
    Internal(String),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }

    fn parts(self) -> (StatusCode, String) {
        match self {
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::TooManyRequests(message) => {
                (StatusCode::TOO_MANY_REQUESTS, message.to_string())
            }
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(message) | DomainError::WeakCredential(message) => {
                ApiError::BadRequest(message)
            }
            DomainError::DuplicateEmail
            | DomainError::AlreadyEnrolled
            | DomainError::AlreadyRated => ApiError::BadRequest(err.to_string()),
            DomainError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DomainError::InvalidCredential | DomainError::Session => {
                ApiError::Unauthorized(err.to_string())
            }
            DomainError::Forbidden(message) => ApiError::Forbidden(message.to_string()),
            DomainError::SessionStore(e) => ApiError::internal(e, "Session store failure"),
            DomainError::Persistence(e) => ApiError::internal(e, "Database operation failed"),
            DomainError::Security(e) => ApiError::internal(e, "Credential processing failed"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.parts();
        let body = ErrorResponse {
            success: false,
            status: status.as_u16(),
            error: message.clone(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
