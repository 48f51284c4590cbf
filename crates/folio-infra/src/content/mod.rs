//! Post persistence on top of a blob store.

mod store;

pub use store::{ContentStore, POSTS_DIR, path_for};

#[cfg(test)]
mod tests;
