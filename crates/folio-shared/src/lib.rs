//! # Folio Shared
//!
//! Request and response types of the HTTP API, shared with any client.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
