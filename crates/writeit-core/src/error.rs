//! Domain-level error types.

use thiserror::Error;

/// Errors raised by the persistence services.
///
/// Variants fall into the input, not-found, write, and store families; see
/// the `is_*` helpers. Every variant reaches the caller unchanged.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0} is required")]
    EmptyInput(&'static str),

    #[error("ID is required")]
    MissingId,

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Not inserted: {0}")]
    NotInserted(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Update failed: {0}")]
    UpdateFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),
}

impl RepoError {
    /// Bad client input detected before any store access.
    pub fn is_input(&self) -> bool {
        matches!(self, RepoError::EmptyInput(_) | RepoError::MissingId)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoError::NotFound { .. })
    }

    /// Unexpected driver or connection failure, as opposed to a write that
    /// the store refused or that matched nothing.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, RepoError::Connection(_) | RepoError::Query(_))
    }
}
