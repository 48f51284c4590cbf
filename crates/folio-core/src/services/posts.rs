//! Post service - create/read/update/delete over a [`PostRepository`].

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Post, PostInput};
use crate::error::{DomainError, RepoError};
use crate::ports::{PostRepository, WriteMode};
use crate::slug;

/// Post workflows: validation, slug assignment and timestamp stamping.
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    /// Every post, newest first.
    pub async fn list(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.repo.list().await?)
    }

    /// Posts visible on the public blog, newest first.
    pub async fn list_published(&self) -> Result<Vec<Post>, DomainError> {
        let mut posts = self.list().await?;
        posts.retain(|p| p.published);
        Ok(posts)
    }

    /// Fetch one post. Unpublished posts are returned too.
    pub async fn get(&self, slug: &str) -> Result<Post, DomainError> {
        self.repo
            .find_by_slug(slug)
            .await
            .map_err(|e| DomainError::from_repo(e, slug))?
            .ok_or_else(|| DomainError::NotFound {
                slug: slug.to_string(),
            })
    }

    /// Create a post. The slug comes from `input.slug` when given, else from the title.
    pub async fn create(&self, input: PostInput) -> Result<Post, DomainError> {
        validate(&input)?;

        let source = input
            .slug
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&input.title);
        let slug = slug::generate(source);
        let now = Utc::now();

        let post = Post {
            slug,
            title: input.title.trim().to_string(),
            content: input.content,
            excerpt: clean_excerpt(input.excerpt),
            tags: clean_tags(input.tags),
            published: input.published.unwrap_or(true),
            published_at: input.published_at.unwrap_or(now),
            updated_at: now,
        };

        self.repo
            .save(&post, WriteMode::Create)
            .await
            .map_err(|e| DomainError::from_repo(e, &post.slug))?;

        tracing::info!(slug = %post.slug, "Post created");
        Ok(post)
    }

    /// Replace the post stored under `slug`. Never creates.
    ///
    /// `published` and `published_at` are kept unless the input carries them;
    /// `updated_at` is re-stamped. A stored file that no longer decodes is
    /// overwritten as if new, so a broken post can be repaired. A different
    /// slug in the input is rejected since the storage path cannot follow it.
    pub async fn update(&self, slug: &str, input: PostInput) -> Result<Post, DomainError> {
        validate(&input)?;

        let desired = input.slug.as_deref().map(str::trim).unwrap_or_default();
        if !desired.is_empty() && desired != slug {
            return Err(DomainError::Validation(format!(
                "slug cannot be changed (from '{}' to '{}')",
                slug, desired
            )));
        }

        let existing = match self.repo.find_by_slug(slug).await {
            Ok(Some(post)) => Some(post),
            Ok(None) => {
                return Err(DomainError::NotFound {
                    slug: slug.to_string(),
                });
            }
            Err(RepoError::Codec(msg)) => {
                tracing::warn!(slug = %slug, error = %msg, "Overwriting unreadable post");
                None
            }
            Err(e) => return Err(DomainError::from_repo(e, slug)),
        };

        let now = Utc::now();
        let post = Post {
            slug: slug.to_string(),
            title: input.title.trim().to_string(),
            content: input.content,
            excerpt: clean_excerpt(input.excerpt),
            tags: clean_tags(input.tags),
            published: input
                .published
                .or(existing.as_ref().map(|p| p.published))
                .unwrap_or(true),
            published_at: input
                .published_at
                .or(existing.as_ref().map(|p| p.published_at))
                .unwrap_or(now),
            updated_at: now,
        };

        self.repo
            .save(&post, WriteMode::Update)
            .await
            .map_err(|e| DomainError::from_repo(e, slug))?;

        tracing::info!(slug = %slug, "Post updated");
        Ok(post)
    }

    /// Delete the post stored under `slug`.
    pub async fn delete(&self, slug: &str) -> Result<(), DomainError> {
        self.repo
            .delete(slug)
            .await
            .map_err(|e| DomainError::from_repo(e, slug))?;

        tracing::info!(slug = %slug, "Post deleted");
        Ok(())
    }
}

fn validate(input: &PostInput) -> Result<(), DomainError> {
    if input.title.trim().is_empty() || input.content.trim().is_empty() {
        return Err(DomainError::Validation(
            "Title and content are required".to_string(),
        ));
    }
    Ok(())
}

fn clean_excerpt(excerpt: Option<String>) -> Option<String> {
    excerpt
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::RepoError;

    /// Repository double that keeps posts in a map and counts every call.
    #[derive(Default)]
    struct MapRepository {
        posts: Mutex<HashMap<String, Post>>,
        calls: AtomicUsize,
    }

    impl MapRepository {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PostRepository for MapRepository {
        async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.posts.lock().unwrap().get(slug).cloned())
        }

        async fn list(&self) -> Result<Vec<Post>, RepoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut posts: Vec<Post> = self.posts.lock().unwrap().values().cloned().collect();
            posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
            Ok(posts)
        }

        async fn save(&self, post: &Post, mode: WriteMode) -> Result<(), RepoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut posts = self.posts.lock().unwrap();
            match (mode, posts.contains_key(&post.slug)) {
                (WriteMode::Create, true) => Err(RepoError::Conflict(post.slug.clone())),
                (WriteMode::Update, false) => Err(RepoError::NotFound),
                _ => {
                    posts.insert(post.slug.clone(), post.clone());
                    Ok(())
                }
            }
        }

        async fn delete(&self, slug: &str) -> Result<(), RepoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.posts
                .lock()
                .unwrap()
                .remove(slug)
                .map(|_| ())
                .ok_or(RepoError::NotFound)
        }
    }

    fn service() -> (PostService, Arc<MapRepository>) {
        let repo = Arc::new(MapRepository::default());
        (PostService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_create_requires_title_and_content() {
        let (service, repo) = service();

        let missing_title = service.create(PostInput::new("  ", "Body")).await;
        assert!(matches!(missing_title, Err(DomainError::Validation(_))));

        let missing_content = service.create(PostInput::new("Title", "")).await;
        assert!(matches!(missing_content, Err(DomainError::Validation(_))));

        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn test_update_validates_before_store_access() {
        let (service, repo) = service();

        let result = service.update("anything", PostInput::new("", "")).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn test_create_derives_slug_and_defaults() {
        let (service, _) = service();

        let mut input = PostInput::new("Hello, World!", "Body");
        input.excerpt = Some("  ".to_string());
        input.tags = vec!["rust".to_string(), "".to_string()];

        let post = service.create(input).await.unwrap();
        assert_eq!(post.slug, "hello-world");
        assert!(post.published);
        assert_eq!(post.excerpt, None);
        assert_eq!(post.tags, vec!["rust".to_string()]);
        assert_eq!(post.published_at, post.updated_at);
    }

    #[tokio::test]
    async fn test_create_honours_requested_slug() {
        let (service, _) = service();

        let mut input = PostInput::new("Some Title", "Body");
        input.slug = Some("My Custom Slug".to_string());

        let post = service.create(input).await.unwrap();
        assert_eq!(post.slug, "my-custom-slug");
    }

    #[tokio::test]
    async fn test_create_colliding_slug_conflicts() {
        let (service, _) = service();

        service.create(PostInput::new("Same", "One")).await.unwrap();
        let second = service.create(PostInput::new("Same", "Two")).await;

        assert!(matches!(second, Err(DomainError::Conflict(_))));
        assert_eq!(service.get("same").await.unwrap().content, "One");
    }

    #[tokio::test]
    async fn test_update_missing_post_is_not_found() {
        let (service, _) = service();

        let result = service
            .update("nonexistent-slug", PostInput::new("Title", "Body"))
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_published_at() {
        let (service, _) = service();
        let created = service.create(PostInput::new("Title", "Body")).await.unwrap();

        let updated = service
            .update(&created.slug, PostInput::new("New Title", "New body"))
            .await
            .unwrap();

        assert_eq!(updated.slug, created.slug);
        assert_eq!(updated.title, "New Title");
        assert_eq!(updated.published_at, created.published_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_without_published_keeps_draft() {
        let (service, _) = service();
        let mut draft = PostInput::new("Draft", "Body");
        draft.published = Some(false);
        service.create(draft).await.unwrap();

        let updated = service
            .update("draft", PostInput::new("Draft", "Edited"))
            .await
            .unwrap();
        assert!(!updated.published);
        assert!(!service.get("draft").await.unwrap().published);

        let mut publish = PostInput::new("Draft", "Edited");
        publish.published = Some(true);
        let published = service.update("draft", publish).await.unwrap();
        assert!(published.published);
    }

    #[tokio::test]
    async fn test_update_rejects_slug_change() {
        let (service, _) = service();
        let created = service.create(PostInput::new("Title", "Body")).await.unwrap();

        let mut input = PostInput::new("Title", "Body");
        input.slug = Some("another-slug".to_string());

        let result = service.update(&created.slug, input).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_published_hides_drafts() {
        let (service, _) = service();

        let mut draft = PostInput::new("Draft", "Body");
        draft.published = Some(false);
        service.create(draft).await.unwrap();
        service.create(PostInput::new("Live", "Body")).await.unwrap();

        let public = service.list_published().await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].slug, "live");

        let direct = service.get("draft").await.unwrap();
        assert!(!direct.published);
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let (service, _) = service();
        let result = service.delete("ghost").await;
        assert!(matches!(result, Err(DomainError::NotFound { slug }) if slug == "ghost"));
    }
}
