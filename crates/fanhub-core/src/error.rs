//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Sign in required")]
    Unauthenticated,

    #[error("Not allowed to perform this action")]
    Forbidden,

    #[error("Another operation of the same kind is still in flight")]
    Busy,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Document-store-level errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Document not found")]
    NotFound,

    /// The transactional precondition did not match the stored state
    /// (e.g. a like marker already exists for a "like" intent).
    #[error("Transaction conflict: {0}")]
    Conflict(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
