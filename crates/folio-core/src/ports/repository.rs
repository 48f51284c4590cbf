use async_trait::async_trait;

use crate::domain::Post;
use crate::error::RepoError;

/// Whether a save may create a new file or must replace an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

/// Post repository - persistence of posts keyed by slug.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find a post by its slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// All readable posts, newest `published_at` first.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// Persist a post at the path derived from its slug.
    async fn save(&self, post: &Post, mode: WriteMode) -> Result<(), RepoError>;

    /// Delete a post by its slug.
    async fn delete(&self, slug: &str) -> Result<(), RepoError>;
}
