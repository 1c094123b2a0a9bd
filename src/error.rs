//! Error types for LMS server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    BadRequest(String),

    /// A query parameter could not be cast to the stored field type
    #[error("{0}")]
    Query(String),

    #[error("{0}")]
    Store(StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Duplicate(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Query(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateKey(msg) => AppError::Duplicate(msg),
            other => AppError::Store(other),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Error body of the write routes
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error body of the read routes
#[derive(Serialize, utoipa::ToSchema)]
pub struct FailureResponse {
    pub success: bool,
    pub message: String,
}

/// Bare message body, used by `GET /lms/books/available`
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::Query(_) | AppError::Store(_) => {
                tracing::error!("Query failed: {}", self);
                let body = Json(FailureResponse {
                    success: false,
                    message: self.to_string(),
                });
                (status, body).into_response()
            }
            other => {
                tracing::debug!("Rejected request: {}", other);
                (status, Json(ErrorResponse { error: other.to_string() })).into_response()
            }
        }
    }
}

/// Wraps an [`AppError`] to render it as `{message}` only
#[derive(Debug)]
pub struct MessageError(pub AppError);

impl From<AppError> for MessageError {
    fn from(e: AppError) -> Self {
        MessageError(e)
    }
}

impl IntoResponse for MessageError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        if self.0.status().is_server_error() {
            tracing::error!("Query failed: {}", self.0);
        }
        let body = Json(MessageResponse {
            message: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
