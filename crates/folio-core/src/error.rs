//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures surfaced to callers.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            // Callers that know the entity map NotFound themselves.
            RepoError::NotFound => DomainError::NotFound {
                entity_type: "entity",
                id: String::new(),
            },
            RepoError::Constraint(msg) => DomainError::Duplicate(msg),
            other => DomainError::Store(other.to_string()),
        }
    }
}
