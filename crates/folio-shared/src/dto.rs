//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Response to a successful login. The token travels in a cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
}

/// Whether the caller holds a valid admin session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Token expiry, seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// Body of create and update requests.
///
/// Title and content default to empty so that missing fields reach
/// validation instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// `{ "posts": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse<T> {
    pub posts: Vec<T>,
}

/// `{ "post": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse<T> {
    pub post: T,
}

/// Result of a create or update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMutationResponse<T> {
    pub post: T,
    pub message: String,
}

/// `{ "message": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A post on the public blog listing, with its teaser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogEntry<T> {
    #[serde(flatten)]
    pub post: T,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_request_missing_fields_default() {
        let req: PostRequest = serde_json::from_str(r#"{"excerpt": "x"}"#).unwrap();
        assert!(req.title.is_empty());
        assert!(req.content.is_empty());
        assert_eq!(req.excerpt.as_deref(), Some("x"));
        assert!(req.tags.is_none());
    }

    #[test]
    fn test_post_request_camel_case() {
        let req: PostRequest = serde_json::from_str(
            r#"{"title": "T", "content": "C", "publishedAt": "2024-06-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(req.published_at.is_some());
    }

    #[test]
    fn test_blog_entry_flattens() {
        let entry = BlogEntry {
            post: serde_json::json!({"slug": "a"}),
            summary: "teaser".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["slug"], "a");
        assert_eq!(json["summary"], "teaser");
    }
}
