//! Blob store implementations - GitHub contents API and in-memory fallback.

mod memory;

#[cfg(feature = "github")]
mod github;

pub use memory::InMemoryBlobStore;

#[cfg(feature = "github")]
pub use github::{GitHubBlobStore, GitHubConfig};
