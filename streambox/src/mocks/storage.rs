//! In-memory key-value store.

use super::lock;
use crate::error::{StorageError, StorageResult};
use crate::providers::KeyValueStore;
use futures::future::{self, BoxFuture, FutureExt};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory key-value store with failure injection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKvStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryKvStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read fail with an I/O error (for testing).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write fail with an I/O error (for testing).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw value under a fully qualified key (for testing).
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    /// Store a raw value under a fully qualified key, bypassing failure
    /// injection (for testing).
    pub fn insert_raw(&self, key: &str, value: &str) {
        lock(&self.entries).insert(key.to_string(), value.to_string());
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }

    fn check(flag: &AtomicBool, operation: &str) -> StorageResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(StorageError::Io(format!("injected {operation} failure")))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for InMemoryKvStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, StorageResult<Option<String>>> {
        let result = Self::check(&self.fail_reads, "read").map(|()| self.raw(key));
        future::ready(result).boxed()
    }

    fn put<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, StorageResult<()>> {
        let result = Self::check(&self.fail_writes, "write").map(|()| {
            lock(&self.entries).insert(key.to_string(), value);
        });
        future::ready(result).boxed()
    }

    fn remove<'a>(&'a self, key: &'a str) -> BoxFuture<'a, StorageResult<()>> {
        let result = Self::check(&self.fail_writes, "write").map(|()| {
            lock(&self.entries).remove(key);
        });
        future::ready(result).boxed()
    }

    fn keys<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, StorageResult<Vec<String>>> {
        let result = Self::check(&self.fail_reads, "read").map(|()| {
            lock(&self.entries)
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect()
        });
        future::ready(result).boxed()
    }
}
