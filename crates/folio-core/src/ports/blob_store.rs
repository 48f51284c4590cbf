//! Blob store port - a remote, path-addressed file store with optimistic
//! concurrency.

use std::fmt;

use async_trait::async_trait;

/// Opaque token identifying one revision of a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file and the revision it was read at.
#[derive(Debug, Clone)]
pub struct Blob {
    pub content: Vec<u8>,
    pub version: VersionToken,
}

/// Blob store trait - abstraction over remote content hosts (GitHub, in-memory).
///
/// Writes carry a human-readable `message`; hosts that keep history record it.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch a file. `Ok(None)` when nothing exists at `path`.
    async fn get(&self, path: &str) -> Result<Option<Blob>, StoreError>;

    /// Write a file.
    ///
    /// With `expected = Some(v)` the write succeeds only if the current
    /// revision is `v`. With `None` the write only creates: an existing file
    /// fails with [`StoreError::Conflict`].
    async fn put(
        &self,
        path: &str,
        content: &[u8],
        expected: Option<&VersionToken>,
        message: &str,
    ) -> Result<VersionToken, StoreError>;

    /// Delete a file at revision `version`.
    async fn delete(
        &self,
        path: &str,
        version: &VersionToken,
        message: &str,
    ) -> Result<(), StoreError>;

    /// List file paths directly under `prefix`. Empty when the directory is missing.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// Blob store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No file at {0}")]
    NotFound(String),

    #[error("Version conflict at {0}")]
    Conflict(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}
