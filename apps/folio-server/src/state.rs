//! Application state - shared across all handlers.

use std::sync::Arc;

use folio_core::ports::BlobStore;
use folio_core::services::{AuthGate, PostService};
use folio_infra::{Argon2PasswordService, ContentStore, InMemoryBlobStore, JwtTokenService};

#[cfg(feature = "github")]
use folio_infra::GitHubBlobStore;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub auth: Arc<AuthGate>,
    pub cookie_secure: bool,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub fn new(config: &AppConfig) -> Self {
        Self::with_store(config, build_store(config))
    }

    /// Build the state over an explicit blob store.
    pub fn with_store(config: &AppConfig, store: Arc<dyn BlobStore>) -> Self {
        let posts = PostService::new(Arc::new(ContentStore::new(store)));
        let auth = AuthGate::new(
            config.admin.clone(),
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            Arc::new(Argon2PasswordService::new()),
        );

        if config.admin.password_hash.is_none() {
            tracing::warn!("ADMIN_PASSWORD_HASH not set. Admin login is disabled.");
        }

        tracing::info!("Application state initialized");

        Self {
            posts: Arc::new(posts),
            auth: Arc::new(auth),
            cookie_secure: config.cookie_secure,
        }
    }
}

#[cfg(feature = "github")]
fn build_store(config: &AppConfig) -> Arc<dyn BlobStore> {
    match &config.github {
        Some(github) => match GitHubBlobStore::new(github.clone()) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!(
                    "Failed to set up GitHub store: {}. Using in-memory fallback.",
                    e
                );
                Arc::new(InMemoryBlobStore::new())
            }
        },
        None => {
            tracing::warn!("GitHub repository not configured. Running with in-memory content store.");
            Arc::new(InMemoryBlobStore::new())
        }
    }
}

#[cfg(not(feature = "github"))]
fn build_store(_config: &AppConfig) -> Arc<dyn BlobStore> {
    tracing::info!("Running without github feature - using in-memory content store");
    Arc::new(InMemoryBlobStore::new())
}
