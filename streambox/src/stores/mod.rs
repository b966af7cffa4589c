//! Storage implementations.
//!
//! - [`FileKvStore`]: the production [`KeyValueStore`](crate::providers::KeyValueStore),
//!   one JSON document on disk
//! - [`PersistentStore`]: namespaced, JSON-encoding facade over any key-value store
//! - [`PersistedValue`]: one typed, write-through key owned by a slice

pub mod file;
pub mod persistent;

pub use file::FileKvStore;
pub use persistent::{PersistedValue, PersistentStore};
