//! Namespaced JSON storage and the write-through helper built on it.

use crate::constants::STORAGE_NAMESPACE;
use crate::error::StorageResult;
use crate::providers::KeyValueStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::Mutex;

/// JSON facade over a [`KeyValueStore`], scoped to this application's
/// namespace.
///
/// Reads fail soft: an unreadable or undecodable record is logged and
/// reported as absent. Writes report their error so the caller can log it.
#[derive(Clone)]
pub struct PersistentStore {
    backend: Arc<dyn KeyValueStore>,
    namespace: String,
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl PersistentStore {
    /// Facade over `backend` using the default namespace.
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            namespace: STORAGE_NAMESPACE.to_string(),
        }
    }

    /// Use a different namespace prefix.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Namespace prefix of every key.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{key}", self.namespace)
    }

    /// Encode `value` as JSON and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`](crate::error::StorageError::Serialization)
    /// if `value` cannot be encoded, or the backend's I/O error.
    pub async fn put<T>(&self, key: &str, value: &T) -> StorageResult<()>
    where
        T: Serialize + ?Sized + Sync,
    {
        let encoded = serde_json::to_string(value)?;
        self.backend.put(&self.namespaced(key), encoded).await
    }

    /// Read and decode the value under `key`; `None` if absent or unusable.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let full_key = self.namespaced(key);

        let raw = match self.backend.get(&full_key).await {
            Ok(raw) => raw?,
            Err(error) => {
                tracing::warn!(key = %full_key, error = %error, "Storage read failed, treating as absent");
                return None;
            },
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(key = %full_key, error = %error, "Stored value is corrupted, treating as absent");
                None
            },
        }
    }

    /// Remove `key`. Absent keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns the backend's I/O error.
    pub async fn remove(&self, key: &str) -> StorageResult<()> {
        self.backend.remove(&self.namespaced(key)).await
    }

    /// Remove every key in this namespace, leaving other keys alone.
    ///
    /// # Errors
    ///
    /// Returns the first backend I/O error.
    pub async fn clear(&self) -> StorageResult<()> {
        let keys = self.backend.keys(&self.namespace).await?;
        for key in &keys {
            self.backend.remove(key).await?;
        }
        tracing::debug!(removed = keys.len(), namespace = %self.namespace, "Cleared namespace");
        Ok(())
    }
}

/// One typed key owned by a slice, written through on every mutation.
///
/// Every write carries the revision of the slice mutation that caused it.
/// Writes are applied one at a time and a write older than the last applied
/// revision is skipped, so the stored value always belongs to the latest
/// mutation even when effect tasks finish out of order.
pub struct PersistedValue<T> {
    store: PersistentStore,
    key: &'static str,
    validator: fn(&T) -> bool,
    applied: Arc<Mutex<u64>>,
    _value: PhantomData<fn() -> T>,
}

impl<T> Clone for PersistedValue<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key,
            validator: self.validator,
            applied: Arc::clone(&self.applied),
            _value: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for PersistedValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedValue").field("key", &self.key).finish_non_exhaustive()
    }
}

impl<T> PersistedValue<T>
where
    T: Serialize + DeserializeOwned + Sync,
{
    /// Key `key` in `store`, accepting any decodable value.
    #[must_use]
    pub fn new(store: PersistentStore, key: &'static str) -> Self {
        Self {
            store,
            key,
            validator: |_| true,
            applied: Arc::new(Mutex::new(0)),
            _value: PhantomData,
        }
    }

    /// Reject decoded values for which `validator` returns `false`.
    #[must_use]
    pub fn with_validator(mut self, validator: fn(&T) -> bool) -> Self {
        self.validator = validator;
        self
    }

    /// Key name, without namespace.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Load the stored value; absent, corrupted and invalid values are `None`.
    pub async fn load(&self) -> Option<T> {
        let value = self.store.get::<T>(self.key).await?;
        if (self.validator)(&value) {
            Some(value)
        } else {
            tracing::warn!(key = self.key, "Stored value failed validation, treating as absent");
            None
        }
    }

    /// Write `value` for mutation `revision`.
    ///
    /// Returns `Ok(false)` if a newer revision was already applied.
    ///
    /// # Errors
    ///
    /// Returns the storage error of the write.
    pub async fn save(&self, revision: u64, value: &T) -> StorageResult<bool> {
        let mut applied = self.applied.lock().await;
        if revision < *applied {
            tracing::debug!(key = self.key, revision, applied = *applied, "Skipping superseded write");
            return Ok(false);
        }
        *applied = revision;
        self.store.put(self.key, value).await?;
        Ok(true)
    }

    /// Remove the value for mutation `revision`.
    ///
    /// Returns `Ok(false)` if a newer revision was already applied.
    ///
    /// # Errors
    ///
    /// Returns the storage error of the removal.
    pub async fn clear(&self, revision: u64) -> StorageResult<bool> {
        let mut applied = self.applied.lock().await;
        if revision < *applied {
            tracing::debug!(key = self.key, revision, applied = *applied, "Skipping superseded clear");
            return Ok(false);
        }
        *applied = revision;
        self.store.remove(self.key).await?;
        Ok(true)
    }
}
