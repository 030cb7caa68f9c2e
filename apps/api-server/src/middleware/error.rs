//! Error handling - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use fanhub_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Forbidden,
    Conflict(String),
    Busy,
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Busy => write!(f, "Operation already in flight"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Busy => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Forbidden => ErrorResponse::forbidden(),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Busy => {
                ErrorResponse::conflict("Another operation of the same kind is still in flight")
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<fanhub_core::DomainError> for AppError {
    fn from(err: fanhub_core::DomainError) -> Self {
        use fanhub_core::DomainError;
        match err {
            DomainError::NotFound { entity, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity, id))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Unauthenticated => AppError::Unauthorized,
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Busy => AppError::Busy,
            DomainError::Store(err) => err.into(),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<fanhub_core::StoreError> for AppError {
    fn from(err: fanhub_core::StoreError) -> Self {
        use fanhub_core::StoreError;
        match err {
            StoreError::NotFound => AppError::NotFound("Document not found".to_string()),
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::Constraint(msg) => AppError::Conflict(msg),
            StoreError::Connection(msg) => {
                tracing::error!("Store connection error: {}", msg);
                AppError::Internal("Store error".to_string())
            }
            StoreError::Query(msg) => {
                tracing::error!("Store query error: {}", msg);
                AppError::Internal("Store error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
