use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use folio_core::DomainError;
use folio_core::domain::{PostFrontmatter, PostInput};
use folio_core::frontmatter;
use folio_core::ports::{Blob, BlobStore, PostRepository, StoreError, VersionToken};
use folio_core::services::PostService;

use super::{ContentStore, path_for};
use crate::store::InMemoryBlobStore;

fn service_over(store: Arc<dyn BlobStore>) -> PostService {
    PostService::new(Arc::new(ContentStore::new(store)))
}

async fn seed(store: &InMemoryBlobStore, slug: &str, published_at: (i32, u32, u32), published: bool) {
    let (y, m, d) = published_at;
    let at = Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap();
    let fm = PostFrontmatter {
        title: slug.to_string(),
        slug: slug.to_string(),
        published_at: at,
        updated_at: at,
        published,
        excerpt: None,
        tags: vec![],
    };
    let text = frontmatter::encode(&fm, "Body").unwrap();
    store
        .put(&path_for(slug), text.as_bytes(), None, "seed")
        .await
        .unwrap();
}

#[test]
fn test_path_for() {
    assert_eq!(path_for("hello-world"), "content/posts/hello-world.md");
}

#[tokio::test]
async fn test_create_then_get() {
    let store = Arc::new(InMemoryBlobStore::new());
    let service = service_over(store.clone());

    let before = Utc::now();
    let created = service.create(PostInput::new("A", "B")).await.unwrap();
    let after = Utc::now();

    let fetched = service.get(&created.slug).await.unwrap();
    assert_eq!(fetched.content, "B");
    assert_eq!(fetched.published_at, created.published_at);
    assert!(fetched.published_at >= before && fetched.published_at <= after);

    service.list().await.unwrap();
    let again = service.get(&created.slug).await.unwrap();
    assert_eq!(again.published_at, created.published_at);

    let raw = store.get("content/posts/a.md").await.unwrap().unwrap();
    let text = String::from_utf8(raw.content).unwrap();
    assert!(text.starts_with("---\ntitle: A\n"));
    assert!(text.ends_with("\n\nB"));
}

#[tokio::test]
async fn test_list_newest_first() {
    let store = Arc::new(InMemoryBlobStore::new());
    seed(&store, "new-year", (2024, 1, 1), true).await;
    seed(&store, "midsummer", (2024, 6, 1), true).await;
    seed(&store, "winter", (2023, 12, 1), true).await;

    let posts = service_over(store).list().await.unwrap();
    let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["midsummer", "new-year", "winter"]);
}

#[tokio::test]
async fn test_list_skips_unreadable_and_foreign_files() {
    let store = Arc::new(InMemoryBlobStore::new());
    seed(&store, "good", (2024, 1, 1), true).await;
    store
        .put("content/posts/broken.md", b"---\ntitle: never closed\n", None, "seed")
        .await
        .unwrap();
    store
        .put("content/posts/notes.txt", b"not a post", None, "seed")
        .await
        .unwrap();
    store
        .put("content/posts/binary.md", &[0xff, 0xfe, 0x00], None, "seed")
        .await
        .unwrap();

    let posts = service_over(store).list().await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].slug, "good");
}

#[tokio::test]
async fn test_unpublished_hidden_from_public_listing_only() {
    let store = Arc::new(InMemoryBlobStore::new());
    seed(&store, "live", (2024, 1, 1), true).await;
    seed(&store, "draft", (2024, 2, 1), false).await;
    let service = service_over(store);

    let public = service.list_published().await.unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].slug, "live");

    assert_eq!(service.list().await.unwrap().len(), 2);
    assert!(!service.get("draft").await.unwrap().published);
}

#[tokio::test]
async fn test_update_nonexistent_never_creates() {
    let store = Arc::new(InMemoryBlobStore::new());
    let service = service_over(store.clone());

    let result = service
        .update("nonexistent-slug", PostInput::new("T", "C"))
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
    assert!(store.get(&path_for("nonexistent-slug")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_rewrites_file() {
    let store = Arc::new(InMemoryBlobStore::new());
    let service = service_over(store);

    let created = service.create(PostInput::new("First", "One")).await.unwrap();
    let mut input = PostInput::new("First, revised", "Two");
    input.tags = vec!["rust".to_string()];
    service.update(&created.slug, input).await.unwrap();

    let fetched = service.get("first").await.unwrap();
    assert_eq!(fetched.title, "First, revised");
    assert_eq!(fetched.content, "Two");
    assert_eq!(fetched.tags, vec!["rust".to_string()]);
    assert_eq!(fetched.published_at, created.published_at);
}

#[tokio::test]
async fn test_delete() {
    let store = Arc::new(InMemoryBlobStore::new());
    let service = service_over(store);

    let created = service.create(PostInput::new("Gone Soon", "Body")).await.unwrap();
    service.delete(&created.slug).await.unwrap();

    assert!(matches!(
        service.get(&created.slug).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        service.delete(&created.slug).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_update_repairs_malformed_post() {
    let store = Arc::new(InMemoryBlobStore::new());
    store
        .put(&path_for("broken"), b"---\ntitle: never closed\n", None, "seed")
        .await
        .unwrap();
    let service = service_over(store);

    assert!(matches!(
        service.get("broken").await,
        Err(DomainError::Upstream(_))
    ));

    let before = Utc::now();
    let repaired = service
        .update("broken", PostInput::new("Fixed", "Body"))
        .await
        .unwrap();
    assert!(repaired.published);
    assert!(repaired.published_at >= before);

    let fetched = service.get("broken").await.unwrap();
    assert_eq!(fetched.title, "Fixed");
    assert_eq!(fetched.content, "Body");
}

#[tokio::test]
async fn test_non_canonical_file_names_are_listed() {
    let store = Arc::new(InMemoryBlobStore::new());
    store
        .put(
            "content/posts/Hello_World.md",
            b"---\ntitle: Hello World\npublishedAt: 2024-03-01T00:00:00Z\n---\n\nBody",
            None,
            "seed",
        )
        .await
        .unwrap();
    let service = service_over(store);

    let posts = service.list().await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].slug, "Hello_World");
    assert_eq!(service.get("Hello_World").await.unwrap().title, "Hello World");
}

#[tokio::test]
async fn test_path_unsafe_slugs_are_not_found() {
    let repo = ContentStore::new(Arc::new(InMemoryBlobStore::new()));

    assert!(repo.find_by_slug("../secret").await.unwrap().is_none());
    assert!(matches!(
        repo.delete("../secret").await,
        Err(folio_core::error::RepoError::NotFound)
    ));
}

#[tokio::test]
async fn test_file_name_wins_over_frontmatter_slug() {
    let store = Arc::new(InMemoryBlobStore::new());
    store
        .put(
            &path_for("real-name"),
            b"---\ntitle: Renamed\nslug: other-name\n---\n\nBody",
            None,
            "seed",
        )
        .await
        .unwrap();

    let post = service_over(store).get("real-name").await.unwrap();
    assert_eq!(post.slug, "real-name");
}

/// Store that lets another writer slip in between the version read and the write.
struct RacingStore {
    inner: InMemoryBlobStore,
    raced: AtomicBool,
}

#[async_trait]
impl BlobStore for RacingStore {
    async fn get(&self, path: &str) -> Result<Option<Blob>, StoreError> {
        self.inner.get(path).await
    }

    async fn put(
        &self,
        path: &str,
        content: &[u8],
        expected: Option<&VersionToken>,
        message: &str,
    ) -> Result<VersionToken, StoreError> {
        if let Some(version) = expected {
            if !self.raced.swap(true, Ordering::SeqCst) {
                self.inner
                    .put(path, b"concurrent edit", Some(version), "racer")
                    .await?;
            }
        }
        self.inner.put(path, content, expected, message).await
    }

    async fn delete(
        &self,
        path: &str,
        version: &VersionToken,
        message: &str,
    ) -> Result<(), StoreError> {
        self.inner.delete(path, version, message).await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        self.inner.list(prefix).await
    }
}

#[tokio::test]
async fn test_concurrent_edit_surfaces_conflict() {
    let store = Arc::new(RacingStore {
        inner: InMemoryBlobStore::new(),
        raced: AtomicBool::new(false),
    });
    let service = service_over(store);

    let created = service.create(PostInput::new("Contested", "v1")).await.unwrap();
    let result = service
        .update(&created.slug, PostInput::new("Contested", "v2"))
        .await;

    assert!(matches!(result, Err(DomainError::Conflict(_))));
}
