//! # API Errors
//!
//! One error type for every route, mapped onto proper HTTP status codes
//! with a single `{error, code}` JSON body shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::entities::ValidationError;
use crate::observability::Logger;
use crate::store::StoreError;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client errors (4xx)
    // ==================
    /// Request field failed validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Request body could not be read as JSON or form data
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Path-bound user id does not resolve to a user
    #[error("unknown user id: {0}")]
    UnknownUser(String),

    /// Username is already taken
    #[error("username already taken: {0}")]
    DuplicateUsername(String),

    // ==================
    // Server errors (5xx)
    // ==================
    /// Store failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Stored state that should not be possible
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownUser(_) => StatusCode::NOT_FOUND,
            ApiError::DuplicateUsername(_) => StatusCode::CONFLICT,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: u16,
}

impl From<&ApiError> for ErrorBody {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.to_string(),
            code: err.status_code().as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            Logger::error("REQUEST_FAILED", &[("error", &self.to_string())]);
        }
        let body = ErrorBody::from(&self);
        (status, Json(body)).into_response()
    }
}
