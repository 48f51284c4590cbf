//! Content store - posts as `content/posts/{slug}.md` files in a [`BlobStore`].

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use folio_core::domain::Post;
use folio_core::error::RepoError;
use folio_core::frontmatter;
use folio_core::ports::{BlobStore, PostRepository, WriteMode};
use folio_core::slug;

/// Directory holding one Markdown file per post.
pub const POSTS_DIR: &str = "content/posts";

const EXTENSION: &str = ".md";

/// A file name that stays inside [`POSTS_DIR`]. Looser than a generated
/// slug so hand-added files such as `Hello_World.md` are still served.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}

/// Storage path for a slug.
pub fn path_for(slug: &str) -> String {
    format!("{}/{}{}", POSTS_DIR, slug, EXTENSION)
}

/// Post repository backed by any blob store.
///
/// The file path is the post's identity: on read, the slug is taken from
/// the path even if the front-matter says otherwise.
pub struct ContentStore {
    store: Arc<dyn BlobStore>,
}

impl ContentStore {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    async fn read_post(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        if !is_safe_name(slug) {
            return Ok(None);
        }

        let Some(blob) = self.store.get(&path_for(slug)).await? else {
            return Ok(None);
        };

        let text = String::from_utf8(blob.content)
            .map_err(|e| RepoError::Codec(format!("{}: {}", slug, e)))?;
        let (frontmatter, content) =
            frontmatter::decode(&text).map_err(|e| RepoError::Codec(format!("{}: {}", slug, e)))?;

        let mut post = Post::from_parts(frontmatter, content);
        if post.slug != slug {
            tracing::warn!(
                path_slug = %slug,
                frontmatter_slug = %post.slug,
                "Front-matter slug differs from file name, using file name"
            );
            post.slug = slug.to_string();
        }

        Ok(Some(post))
    }
}

#[async_trait]
impl PostRepository for ContentStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        tracing::debug!(slug = %slug, "Reading post");
        self.read_post(slug).await
    }

    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let prefix = format!("{}/", POSTS_DIR);
        let slugs: Vec<String> = self
            .store
            .list(POSTS_DIR)
            .await?
            .into_iter()
            .filter_map(|path| {
                path.strip_prefix(&prefix)
                    .and_then(|name| name.strip_suffix(EXTENSION))
                    .map(String::from)
            })
            .collect();

        for slug in slugs.iter().filter(|s| !slug::is_valid(s)) {
            tracing::warn!(slug = %slug, "Post file name is not a canonical slug");
        }

        let results = join_all(slugs.iter().map(|slug| self.read_post(slug))).await;

        let mut posts = Vec::with_capacity(results.len());
        for (slug, result) in slugs.iter().zip(results) {
            match result {
                Ok(Some(post)) => posts.push(post),
                Ok(None) => tracing::warn!(slug = %slug, "Skipping post that vanished or has an unsafe file name"),
                Err(e) => tracing::warn!(slug = %slug, error = %e, "Skipping unreadable post"),
            }
        }

        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(posts)
    }

    async fn save(&self, post: &Post, mode: WriteMode) -> Result<(), RepoError> {
        if !is_safe_name(&post.slug) {
            return Err(RepoError::Codec(format!("invalid slug '{}'", post.slug)));
        }

        let path = path_for(&post.slug);
        let text = frontmatter::encode(&post.frontmatter(), &post.content)
            .map_err(|e| RepoError::Codec(e.to_string()))?;

        match mode {
            WriteMode::Create => {
                let message = format!("Create blog post: {}", post.title);
                self.store
                    .put(&path, text.as_bytes(), None, &message)
                    .await?;
            }
            WriteMode::Update => {
                let current = self.store.get(&path).await?.ok_or(RepoError::NotFound)?;
                let message = format!("Update blog post: {}", post.title);
                self.store
                    .put(&path, text.as_bytes(), Some(&current.version), &message)
                    .await?;
            }
        }

        Ok(())
    }

    async fn delete(&self, slug: &str) -> Result<(), RepoError> {
        if !is_safe_name(slug) {
            return Err(RepoError::NotFound);
        }

        let path = path_for(slug);
        let current = self.store.get(&path).await?.ok_or(RepoError::NotFound)?;
        let message = format!("Delete blog post: {}", slug);
        self.store.delete(&path, &current.version, &message).await?;

        Ok(())
    }
}
