//! # Folio Core
//!
//! The domain layer of the Folio blog backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the post model, the slug generator, the front-matter codec, the ports that
//! adapters implement, and the services that orchestrate them.

pub mod domain;
pub mod error;
pub mod frontmatter;
pub mod ports;
pub mod services;
pub mod slug;

pub use error::DomainError;
