use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::slug;

/// Number of content characters kept when a summary is derived from the body.
pub const SUMMARY_LENGTH: usize = 150;

const DEFAULT_TITLE: &str = "Untitled";

/// Post entity - a Markdown blog post and its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub published: bool,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Join a metadata block with its Markdown body.
    pub fn from_parts(frontmatter: PostFrontmatter, content: String) -> Self {
        Self {
            slug: frontmatter.slug,
            title: frontmatter.title,
            content,
            excerpt: frontmatter.excerpt,
            tags: frontmatter.tags,
            published: frontmatter.published,
            published_at: frontmatter.published_at,
            updated_at: frontmatter.updated_at,
        }
    }

    /// Metadata half of the post, without the body.
    pub fn frontmatter(&self) -> PostFrontmatter {
        PostFrontmatter {
            title: self.title.clone(),
            slug: self.slug.clone(),
            published_at: self.published_at,
            updated_at: self.updated_at,
            published: self.published,
            excerpt: self.excerpt.clone(),
            tags: self.tags.clone(),
        }
    }

    /// Short teaser for listings.
    ///
    /// Uses the explicit excerpt when there is one, otherwise the first
    /// [`SUMMARY_LENGTH`] characters of the body with Markdown markers removed.
    pub fn summary(&self) -> String {
        if let Some(excerpt) = &self.excerpt {
            return excerpt.clone();
        }

        let mut chars = self.content.chars();
        let head: String = chars
            .by_ref()
            .take(SUMMARY_LENGTH)
            .filter(|c| !matches!(c, '#' | '*' | '_' | '`' | '-'))
            .collect();
        let head = head.split_whitespace().collect::<Vec<_>>().join(" ");

        if chars.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }
}

/// Post metadata as stored in the front-matter block.
#[derive(Debug, Clone, PartialEq)]
pub struct PostFrontmatter {
    pub title: String,
    pub slug: String,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published: bool,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
}

impl PostFrontmatter {
    /// Resolve every missing or blank field of a parsed metadata block.
    ///
    /// This is the one place defaults are decided: a missing title becomes
    /// "Untitled", a missing slug is derived from the title, missing
    /// timestamps become `now`, and only an explicit `false` unpublishes.
    pub fn resolve(raw: RawFrontmatter, now: DateTime<Utc>) -> Self {
        let title = non_blank(raw.title).unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let slug = non_blank(raw.slug).unwrap_or_else(|| slug::generate(&title));

        Self {
            slug,
            title,
            published_at: raw.published_at.unwrap_or(now),
            updated_at: raw.updated_at.unwrap_or(now),
            published: raw.published != Some(false),
            excerpt: non_blank(raw.excerpt),
            tags: raw
                .tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

/// Tolerant view of a metadata block where every field may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFrontmatter {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub published: Option<bool>,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
}

/// Input for creating or updating a post.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub published: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
    /// Desired slug. Honoured on create; must match the target on update.
    pub slug: Option<String>,
}

impl PostInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post(content: &str, excerpt: Option<&str>) -> Post {
        let now = Utc::now();
        Post {
            slug: "sample".to_string(),
            title: "Sample".to_string(),
            content: content.to_string(),
            excerpt: excerpt.map(String::from),
            tags: vec![],
            published: true,
            published_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let now = Utc::now();
        let fm = PostFrontmatter::resolve(RawFrontmatter::default(), now);

        assert_eq!(fm.title, "Untitled");
        assert_eq!(fm.slug, "untitled");
        assert_eq!(fm.published_at, now);
        assert_eq!(fm.updated_at, now);
        assert!(fm.published);
        assert_eq!(fm.excerpt, None);
        assert!(fm.tags.is_empty());
    }

    #[test]
    fn test_resolve_derives_slug_from_title() {
        let raw = RawFrontmatter {
            title: Some("Rust Ownership Explained".to_string()),
            ..Default::default()
        };
        let fm = PostFrontmatter::resolve(raw, Utc::now());
        assert_eq!(fm.slug, "rust-ownership-explained");
    }

    #[test]
    fn test_resolve_only_explicit_false_unpublishes() {
        let unpublished = RawFrontmatter {
            published: Some(false),
            ..Default::default()
        };
        assert!(!PostFrontmatter::resolve(unpublished, Utc::now()).published);

        let published = RawFrontmatter {
            published: Some(true),
            ..Default::default()
        };
        assert!(PostFrontmatter::resolve(published, Utc::now()).published);
    }

    #[test]
    fn test_resolve_drops_blank_excerpt_and_tags() {
        let raw = RawFrontmatter {
            excerpt: Some("   ".to_string()),
            tags: vec!["rust".to_string(), " ".to_string(), " web ".to_string()],
            ..Default::default()
        };
        let fm = PostFrontmatter::resolve(raw, Utc::now());
        assert_eq!(fm.excerpt, None);
        assert_eq!(fm.tags, vec!["rust".to_string(), "web".to_string()]);
    }

    #[test]
    fn test_from_parts_and_frontmatter_agree() {
        let post = sample_post("Body", Some("Teaser"));
        let rebuilt = Post::from_parts(post.frontmatter(), post.content.clone());
        assert_eq!(rebuilt, post);
    }

    #[test]
    fn test_summary_prefers_excerpt() {
        let post = sample_post("# Heading\n\nLong body", Some("Hand written"));
        assert_eq!(post.summary(), "Hand written");
    }

    #[test]
    fn test_summary_strips_markdown_and_truncates() {
        let short = sample_post("# Hello **world**", None);
        assert_eq!(short.summary(), "Hello world");

        let long = sample_post(&"a".repeat(SUMMARY_LENGTH + 10), None);
        let summary = long.summary();
        assert!(summary.ends_with("..."));
        assert_eq!(summary.len(), SUMMARY_LENGTH + 3);
    }

    #[test]
    fn test_post_serializes_camel_case() {
        let post = sample_post("Body", None);
        let json = serde_json::to_value(&post).unwrap();
        assert!(json.get("publishedAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("excerpt").is_none());
    }
}
