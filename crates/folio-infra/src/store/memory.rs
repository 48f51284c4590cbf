//! In-memory blob store - used when no GitHub repository is configured, and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use folio_core::ports::{Blob, BlobStore, StoreError, VersionToken};

struct StoredFile {
    content: Vec<u8>,
    version: VersionToken,
}

#[derive(Default)]
struct Files {
    entries: HashMap<String, StoredFile>,
    revision: u64,
}

impl Files {
    fn next_version(&mut self) -> VersionToken {
        self.revision += 1;
        VersionToken::new(format!("rev-{}", self.revision))
    }
}

/// In-memory blob store using a HashMap behind an async RwLock.
///
/// Follows the same version-token rules as the GitHub store.
/// Note: Data is lost on process restart.
pub struct InMemoryBlobStore {
    files: RwLock<Files>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(Files::default()),
        }
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn get(&self, path: &str) -> Result<Option<Blob>, StoreError> {
        let files = self.files.read().await;
        Ok(files.entries.get(path).map(|file| Blob {
            content: file.content.clone(),
            version: file.version.clone(),
        }))
    }

    async fn put(
        &self,
        path: &str,
        content: &[u8],
        expected: Option<&VersionToken>,
        message: &str,
    ) -> Result<VersionToken, StoreError> {
        let mut files = self.files.write().await;

        let current = files.entries.get(path).map(|f| &f.version);
        match (expected, current) {
            (None, None) => {}
            (Some(expected), Some(current)) if expected == current => {}
            (Some(_), None) => return Err(StoreError::NotFound(path.to_string())),
            _ => return Err(StoreError::Conflict(path.to_string())),
        }

        let version = files.next_version();
        files.entries.insert(
            path.to_string(),
            StoredFile {
                content: content.to_vec(),
                version: version.clone(),
            },
        );

        tracing::debug!(path = %path, version = %version, message = %message, "Stored blob");
        Ok(version)
    }

    async fn delete(
        &self,
        path: &str,
        version: &VersionToken,
        message: &str,
    ) -> Result<(), StoreError> {
        let mut files = self.files.write().await;

        match files.entries.get(path) {
            None => return Err(StoreError::NotFound(path.to_string())),
            Some(file) if &file.version != version => {
                return Err(StoreError::Conflict(path.to_string()));
            }
            Some(_) => {}
        }

        files.entries.remove(path);
        tracing::debug!(path = %path, message = %message, "Deleted blob");
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let dir = format!("{}/", prefix.trim_end_matches('/'));
        let files = self.files.read().await;

        let mut paths: Vec<String> = files
            .entries
            .keys()
            .filter(|path| {
                path.strip_prefix(&dir)
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
            })
            .cloned()
            .collect();
        paths.sort();
        Ok(paths)
    }
}
