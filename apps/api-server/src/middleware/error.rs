//! Error handling - every failure renders as an error envelope.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use writeit_core::RepoError;
use writeit_shared::Envelope;

/// Application-level error type. The message becomes the envelope's
/// `message`; the variant picks its status code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Map a persistence failure raised at a stage whose client-facing
    /// status is `stage`. Store failures are always internal errors.
    pub fn from_repo(err: RepoError, stage: fn(String) -> AppError) -> Self {
        if err.is_store_failure() {
            AppError::Internal(err.to_string())
        } else {
            stage(err.to_string())
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Internal error: {}", self);
        } else {
            tracing::debug!(status = status.as_u16(), "Request failed: {}", self);
        }

        HttpResponse::build(status).json(Envelope::<()>::error(status.as_u16(), self.to_string()))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
