//! Key-value store trait.

use crate::error::StorageResult;
use futures::future::BoxFuture;

/// Durable, asynchronous string-keyed storage.
///
/// Values are opaque strings; encoding is the caller's concern (see
/// [`crate::stores::PersistentStore`]).
///
/// # Implementation Notes
///
/// - `remove` must be idempotent: removing an absent key succeeds
/// - A successful `put` must be durable once its future resolves
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StorageError::Io`] if the device cannot be read.
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, StorageResult<Option<String>>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StorageError::Io`] if the write fails.
    fn put<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, StorageResult<()>>;

    /// Remove `key`. Absent keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StorageError::Io`] if the write fails.
    fn remove<'a>(&'a self, key: &'a str) -> BoxFuture<'a, StorageResult<()>>;

    /// All keys starting with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StorageError::Io`] if the device cannot be read.
    fn keys<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, StorageResult<Vec<String>>>;
}
