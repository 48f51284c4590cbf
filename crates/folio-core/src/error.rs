//! Domain-level error types.

use thiserror::Error;

use crate::ports::StoreError;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Post not found: {slug}")]
    NotFound { slug: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflicting write: {0}")]
    Conflict(String),

    #[error("Content store error: {0}")]
    Upstream(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Entity not found")]
    NotFound,

    #[error("Version conflict: {0}")]
    Conflict(String),

    #[error("Stored post is malformed: {0}")]
    Codec(String),

    #[error("Content store request failed: {0}")]
    Upstream(String),
}

impl From<StoreError> for RepoError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => RepoError::NotFound,
            StoreError::Conflict(path) => RepoError::Conflict(path),
            StoreError::Upstream(msg) => RepoError::Upstream(msg),
        }
    }
}

impl DomainError {
    /// Map a repository failure for the post identified by `slug`.
    pub fn from_repo(err: RepoError, slug: &str) -> Self {
        match err {
            RepoError::NotFound => DomainError::NotFound {
                slug: slug.to_string(),
            },
            RepoError::Conflict(msg) => DomainError::Conflict(msg),
            RepoError::Codec(msg) | RepoError::Upstream(msg) => DomainError::Upstream(msg),
        }
    }
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        DomainError::from_repo(err, "")
    }
}
