//! File-backed key-value store.
//!
//! All keys live in a single JSON object at `<dir>/streambox-store.json`.
//! The document is loaded on first access and rewritten on every mutation
//! through a temporary file and a rename, so a crash mid-write leaves either
//! the old or the new document, never a truncated one.

use crate::constants::STORE_FILE_NAME;
use crate::error::StorageResult;
use crate::providers::KeyValueStore;
use futures::future::{BoxFuture, FutureExt};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

type Entries = BTreeMap<String, String>;

/// Key-value store persisted as one JSON document.
#[derive(Debug)]
pub struct FileKvStore {
    path: PathBuf,
    /// `None` until the document has been read.
    entries: Mutex<Option<Entries>>,
}

impl FileKvStore {
    /// Store whose document lives in `dir`. Nothing is read until first use.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::at_path(dir.as_ref().join(STORE_FILE_NAME))
    }

    /// Store backed by exactly `path`.
    #[must_use]
    pub const fn at_path(path: PathBuf) -> Self {
        Self {
            path,
            entries: Mutex::const_new(None),
        }
    }

    /// Location of the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(path: &Path) -> StorageResult<Entries> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(error) => return Err(error.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %error,
                    "Store document is corrupted, starting empty"
                );
                Ok(Entries::new())
            },
        }
    }

    async fn write(&self, entries: &Entries) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let body = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::trace!(path = %self.path.display(), keys = entries.len(), "Store document written");
        Ok(())
    }

    /// Apply `mutate` to a copy of the entries, persist it, then commit it in
    /// memory. A failed write leaves the in-memory view unchanged.
    async fn mutate<F>(&self, mutate: F) -> StorageResult<()>
    where
        F: FnOnce(&mut Entries) -> bool + Send,
    {
        let mut guard = self.entries.lock().await;
        let mut next = match guard.as_ref() {
            Some(entries) => entries.clone(),
            None => Self::load(&self.path).await?,
        };

        if mutate(&mut next) {
            self.write(&next).await?;
        }
        *guard = Some(next);
        Ok(())
    }

    async fn read<T, F>(&self, read: F) -> StorageResult<T>
    where
        F: FnOnce(&Entries) -> T + Send,
    {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(Self::load(&self.path).await?);
        }
        Ok(read(guard.get_or_insert_with(Entries::new)))
    }
}

impl KeyValueStore for FileKvStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, StorageResult<Option<String>>> {
        self.read(move |entries| entries.get(key).cloned()).boxed()
    }

    fn put<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, StorageResult<()>> {
        self.mutate(move |entries| {
            entries.insert(key.to_string(), value);
            true
        })
        .boxed()
    }

    fn remove<'a>(&'a self, key: &'a str) -> BoxFuture<'a, StorageResult<()>> {
        self.mutate(move |entries| entries.remove(key).is_some()).boxed()
    }

    fn keys<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, StorageResult<Vec<String>>> {
        self.read(move |entries| {
            entries
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect()
        })
        .boxed()
    }
}
