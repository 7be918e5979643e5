//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::ports::{AuthError, StorageError};

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} with id {id} not found")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    /// Missing, malformed or expired credential.
    #[error(transparent)]
    Unauthenticated(#[from] AuthError),

    /// Authenticated, but not the author of the resource.
    #[error("You are not the author of this {0}")]
    Forbidden(&'static str),

    #[error("File storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity_type, id }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// The row points at a parent that does not exist, e.g. a comment on a
    /// post deleted concurrently.
    #[error("Missing referenced row: {0}")]
    MissingReference(String),

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => DomainError::Duplicate(msg),
            other => DomainError::Internal(other.to_string()),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Turn a store-level `NotFound` into a domain `NotFound` for a known entity.
pub trait RepoResultExt<T> {
    fn or_not_found(self, entity_type: &'static str, id: Uuid) -> DomainResult<T>;
}

impl<T> RepoResultExt<T> for Result<T, RepoError> {
    fn or_not_found(self, entity_type: &'static str, id: Uuid) -> DomainResult<T> {
        self.map_err(|err| match err {
            RepoError::NotFound | RepoError::MissingReference(_) => {
                DomainError::not_found(entity_type, id)
            }
            other => other.into(),
        })
    }
}
