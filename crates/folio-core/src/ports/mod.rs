//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod blob_store;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use blob_store::{Blob, BlobStore, StoreError, VersionToken};
pub use repository::{PostRepository, WriteMode};
