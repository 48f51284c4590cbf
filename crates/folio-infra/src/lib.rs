//! # Folio Infrastructure
//!
//! Concrete implementations of the ports defined in `folio-core`.
//! This crate contains the blob stores, the post content store, and the
//! authentication services.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory store only
//! - `github` - GitHub contents API blob store via reqwest
//! - `auth` - JWT + Argon2 authentication

pub mod content;
pub mod store;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - always available
pub use content::ContentStore;
pub use store::InMemoryBlobStore;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "github")]
pub use store::{GitHubBlobStore, GitHubConfig};
