//! Services - orchestration of domain rules over the ports.

mod auth;
mod posts;

pub use auth::{AdminCredentials, AdminSession, AuthGate};
pub use posts::PostService;
