//! GitHub blob store - files in a repository branch via the contents REST API.
//!
//! The file SHA returned by the API is the version token; GitHub rejects a
//! write or delete whose SHA no longer matches the branch head.

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, Response, StatusCode, header};
use serde::Deserialize;

use folio_core::ports::{Blob, BlobStore, StoreError, VersionToken};

const API_VERSION: &str = "2022-11-28";

/// GitHub repository configuration.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// API base, e.g. `https://api.github.com` or a GitHub Enterprise endpoint.
    pub api_url: String,
}

impl GitHubConfig {
    pub fn new(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            branch: "main".to_string(),
            api_url: "https://api.github.com".to_string(),
        }
    }
}

/// One item of a contents API response (file or directory entry).
#[derive(Debug, Deserialize)]
struct ContentEntry {
    #[serde(rename = "type")]
    kind: String,
    path: String,
    sha: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

/// Response of a create/update call.
#[derive(Debug, Deserialize)]
struct WriteResponse {
    content: WrittenFile,
}

#[derive(Debug, Deserialize)]
struct WrittenFile {
    sha: String,
}

/// GitHub-backed blob store.
pub struct GitHubBlobStore {
    client: Client,
    config: GitHubConfig,
}

impl GitHubBlobStore {
    pub fn new(config: GitHubConfig) -> Result<Self, StoreError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            header::HeaderValue::from_static(API_VERSION),
        );

        let client = Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Upstream(e.to_string()))?;

        tracing::info!(
            owner = %config.owner,
            repo = %config.repo,
            branch = %config.branch,
            "Using GitHub content store"
        );

        Ok(Self { client, config })
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.owner,
            self.config.repo,
            path.trim_start_matches('/')
        )
    }

    async fn fetch(&self, path: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let response = self
            .client
            .get(self.contents_url(path))
            .bearer_auth(&self.config.token)
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await
            .map_err(|e| StoreError::Upstream(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json()
                .await
                .map(Some)
                .map_err(|e| StoreError::Upstream(e.to_string())),
            _ => Err(unexpected(path, response).await),
        }
    }
}

#[async_trait]
impl BlobStore for GitHubBlobStore {
    async fn get(&self, path: &str) -> Result<Option<Blob>, StoreError> {
        let Some(body) = self.fetch(path).await? else {
            return Ok(None);
        };
        if body.is_array() {
            return Ok(None);
        }

        let entry: ContentEntry =
            serde_json::from_value(body).map_err(|e| StoreError::Upstream(e.to_string()))?;
        if entry.kind != "file" {
            return Ok(None);
        }
        if entry.encoding.as_deref() != Some("base64") {
            return Err(StoreError::Upstream(format!(
                "{} is not served inline (encoding {:?})",
                path, entry.encoding
            )));
        }

        let content = decode_content(entry.content.as_deref().unwrap_or_default())?;
        Ok(Some(Blob {
            content,
            version: VersionToken::new(entry.sha),
        }))
    }

    async fn put(
        &self,
        path: &str,
        content: &[u8],
        expected: Option<&VersionToken>,
        message: &str,
    ) -> Result<VersionToken, StoreError> {
        let mut body = serde_json::json!({
            "message": message,
            "content": STANDARD.encode(content),
            "branch": self.config.branch,
        });
        if let Some(sha) = expected {
            body["sha"] = serde_json::Value::String(sha.as_str().to_string());
        }

        let response = self
            .client
            .put(self.contents_url(path))
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Upstream(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                let written: WriteResponse = response
                    .json()
                    .await
                    .map_err(|e| StoreError::Upstream(e.to_string()))?;
                tracing::debug!(path = %path, sha = %written.content.sha, "Committed file");
                Ok(VersionToken::new(written.content.sha))
            }
            // 422 without a sha means the file already exists
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(StoreError::Conflict(path.to_string()))
            }
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(path.to_string())),
            _ => Err(unexpected(path, response).await),
        }
    }

    async fn delete(
        &self,
        path: &str,
        version: &VersionToken,
        message: &str,
    ) -> Result<(), StoreError> {
        let body = serde_json::json!({
            "message": message,
            "sha": version.as_str(),
            "branch": self.config.branch,
        });

        let response = self
            .client
            .delete(self.contents_url(path))
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Upstream(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                tracing::debug!(path = %path, "Deleted file");
                Ok(())
            }
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(path.to_string())),
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(StoreError::Conflict(path.to_string()))
            }
            _ => Err(unexpected(path, response).await),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let Some(body) = self.fetch(prefix).await? else {
            return Ok(Vec::new());
        };

        let entries: Vec<ContentEntry> = match body {
            serde_json::Value::Array(_) => {
                serde_json::from_value(body).map_err(|e| StoreError::Upstream(e.to_string()))?
            }
            _ => {
                return Err(StoreError::Upstream(format!("{} is not a directory", prefix)));
            }
        };

        Ok(entries
            .into_iter()
            .filter(|e| e.kind == "file")
            .map(|e| e.path)
            .collect())
    }
}

/// The API wraps base64 payloads at 60 columns.
fn decode_content(encoded: &str) -> Result<Vec<u8>, StoreError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| StoreError::Upstream(format!("invalid base64 content: {}", e)))
}

async fn unexpected(path: &str, response: Response) -> StoreError {
    let status = response.status();
    let detail = response.text().await.unwrap_or_default();
    tracing::warn!(path = %path, status = %status, "Unexpected GitHub response");
    StoreError::Upstream(format!("GitHub returned {} for {}: {}", status, path, detail))
}
