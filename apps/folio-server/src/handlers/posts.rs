//! Post handlers. Reads are public, writes need an admin session.

use actix_web::{HttpResponse, web};

use folio_core::domain::{Post, PostInput};
use folio_shared::dto::{
    BlogEntry, MessageResponse, PostListResponse, PostMutationResponse, PostRequest,
    PostResponse,
};

use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn to_input(req: PostRequest) -> PostInput {
    PostInput {
        title: req.title,
        content: req.content,
        excerpt: req.excerpt,
        tags: req.tags.unwrap_or_default(),
        published: req.published,
        published_at: req.published_at,
        slug: req.slug,
    }
}

/// GET /api/posts
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    Ok(HttpResponse::Ok().json(PostListResponse { posts }))
}

/// GET /api/posts/{slug}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let post = state.posts.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostResponse { post }))
}

/// GET /api/blog - published posts with their summaries.
pub async fn blog(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts: Vec<BlogEntry<Post>> = state
        .posts
        .list_published()
        .await?
        .into_iter()
        .map(|post| {
            let summary = post.summary();
            BlogEntry { post, summary }
        })
        .collect();

    Ok(HttpResponse::Ok().json(PostListResponse { posts }))
}

/// POST /api/posts
pub async fn create(
    identity: AdminIdentity,
    state: web::Data<AppState>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state.posts.create(to_input(body.into_inner())).await?;
    tracing::debug!(admin = %identity.username, slug = %post.slug, "Post created via API");

    Ok(HttpResponse::Created().json(PostMutationResponse {
        post,
        message: "Post created successfully".to_string(),
    }))
}

/// PUT /api/posts/{slug}
pub async fn update(
    identity: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let post = state
        .posts
        .update(&slug, to_input(body.into_inner()))
        .await?;
    tracing::debug!(admin = %identity.username, slug = %slug, "Post updated via API");

    Ok(HttpResponse::Ok().json(PostMutationResponse {
        post,
        message: "Post updated successfully".to_string(),
    }))
}

/// DELETE /api/posts/{slug}
pub async fn delete(
    identity: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    state.posts.delete(&slug).await?;
    tracing::debug!(admin = %identity.username, slug = %slug, "Post deleted via API");

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}
