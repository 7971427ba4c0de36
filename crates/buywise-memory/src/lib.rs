//! File-backed memory of past product analyses.
//!
//! Every analysis lives in its own JSON file under the memory directory,
//! next to a single `user_preferences.json` holding the server-side
//! preference record.

pub mod entry;
pub mod error;
pub mod store;

pub use entry::{canonical_url, file_stem, product_id, product_key, MemoryEntry};
pub use error::MemoryError;
pub use store::{MemoryStore, PREFERENCES_FILE};
