//! Front-matter codec - posts as Markdown files with a YAML metadata block.
//!
//! ```markdown
//! ---
//! title: Hello World
//! slug: hello-world
//! publishedAt: 2024-06-01T09:30:00Z
//! updatedAt: 2024-06-01T09:30:00Z
//! published: true
//! tags:
//! - rust
//! ---
//!
//! Body here
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_yaml::Value;
use thiserror::Error;

use crate::domain::{PostFrontmatter, RawFrontmatter};

const DELIMITER: &str = "---";

/// Front-matter encoding/decoding errors.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unclosed front-matter block - missing closing ---")]
    Unclosed,

    #[error("front-matter is not a key/value mapping")]
    NotAMapping,

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// On-disk field order and naming. Optional fields are left out when empty.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredFrontmatter<'a> {
    title: &'a str,
    slug: &'a str,
    published_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    excerpt: Option<&'a str>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    tags: &'a [String],
}

/// Render a post file: metadata block, blank line, body unmodified.
pub fn encode(frontmatter: &PostFrontmatter, content: &str) -> Result<String, CodecError> {
    let stored = StoredFrontmatter {
        title: &frontmatter.title,
        slug: &frontmatter.slug,
        published_at: frontmatter.published_at,
        updated_at: frontmatter.updated_at,
        published: frontmatter.published,
        excerpt: frontmatter.excerpt.as_deref().filter(|e| !e.is_empty()),
        tags: &frontmatter.tags,
    };
    let yaml = serde_yaml::to_string(&stored)?;

    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n\n{content}"))
}

/// Parse a post file into resolved metadata and a trimmed body.
///
/// Missing fields are defaulted through [`PostFrontmatter::resolve`]; a file
/// without any metadata block is treated as all body.
pub fn decode(text: &str) -> Result<(PostFrontmatter, String), CodecError> {
    decode_at(text, Utc::now())
}

/// Same as [`decode`] with an explicit clock for the timestamp defaults.
pub fn decode_at(text: &str, now: DateTime<Utc>) -> Result<(PostFrontmatter, String), CodecError> {
    let (block, body) = split(text)?;
    let raw = match block {
        Some(yaml) => parse_block(yaml)?,
        None => RawFrontmatter::default(),
    };

    Ok((PostFrontmatter::resolve(raw, now), body.trim().to_string()))
}

/// Separate the metadata block from the body. The block must open on the
/// first line and close on a line holding only the delimiter.
fn split(text: &str) -> Result<(Option<&str>, &str), CodecError> {
    let text = text.trim_start_matches('\u{feff}');

    let mut lines = text.split_inclusive('\n');
    let opened = lines
        .next()
        .is_some_and(|first| first.trim_end() == DELIMITER);
    if !opened {
        return Ok((None, text));
    }

    let block_start = text.find('\n').map(|i| i + 1).unwrap_or(text.len());
    let mut offset = block_start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            let block = &text[block_start..offset];
            let body = &text[offset + line.len()..];
            return Ok((Some(block), body));
        }
        offset += line.len();
    }

    Err(CodecError::Unclosed)
}

fn parse_block(yaml: &str) -> Result<RawFrontmatter, CodecError> {
    if yaml.trim().is_empty() {
        return Ok(RawFrontmatter::default());
    }

    let value: Value = serde_yaml::from_str(yaml)?;
    match value {
        Value::Null => return Ok(RawFrontmatter::default()),
        Value::Mapping(_) => {}
        _ => return Err(CodecError::NotAMapping),
    }

    Ok(RawFrontmatter {
        title: value.get("title").and_then(scalar_text),
        slug: value.get("slug").and_then(scalar_text),
        published_at: value.get("publishedAt").and_then(timestamp),
        updated_at: value.get("updatedAt").and_then(timestamp),
        published: value.get("published").and_then(flag),
        excerpt: value.get("excerpt").and_then(scalar_text),
        tags: value.get("tags").map(tag_list).unwrap_or_default(),
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let text = scalar_text(value)?;
    let text = text.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Tags may be a YAML sequence or a single comma-separated string.
fn tag_list(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items.iter().filter_map(scalar_text).collect(),
        Value::String(s) => s.split(',').map(|t| t.trim().to_string()).collect(),
        _ => Vec::new(),
    }
}
