//! The on-disk key-value store.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::sync::Arc;
use std::time::Duration;
use streambox::constants::STORE_FILE_NAME;
use streambox::mocks::{MockCatalog, MockIdentity};
use streambox::providers::KeyValueStore;
use streambox::stores::{FileKvStore, PersistentStore};
use streambox::{AppEnvironment, FavoritesAction, MovieId, StreamBox, ThemePreference};

#[tokio::test]
async fn test_values_survive_a_new_instance() {
    let dir = tempfile::tempdir().unwrap();

    let store = FileKvStore::new(dir.path());
    store.put("@streambox/theme", "\"dark\"".to_string()).await.unwrap();
    store.put("@streambox/favorites", "[1,2]".to_string()).await.unwrap();
    store.remove("@streambox/favorites").await.unwrap();
    assert!(dir.path().join(STORE_FILE_NAME).exists());

    let reopened = FileKvStore::new(dir.path());
    assert_eq!(reopened.get("@streambox/theme").await.unwrap().as_deref(), Some("\"dark\""));
    assert_eq!(reopened.get("@streambox/favorites").await.unwrap(), None);
}

#[tokio::test]
async fn test_missing_directory_is_created_on_first_write() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");

    let store = FileKvStore::new(&nested);
    assert_eq!(store.get("anything").await.unwrap(), None);
    store.put("k", "1".to_string()).await.unwrap();

    assert!(nested.join(STORE_FILE_NAME).exists());
}

#[tokio::test]
async fn test_corrupted_document_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(STORE_FILE_NAME), "{ definitely not json").unwrap();

    let store = FileKvStore::new(dir.path());
    assert_eq!(store.get("@streambox/theme").await.unwrap(), None);

    store.put("@streambox/theme", "\"light\"".to_string()).await.unwrap();
    let reopened = FileKvStore::new(dir.path());
    assert_eq!(reopened.get("@streambox/theme").await.unwrap().as_deref(), Some("\"light\""));
}

#[tokio::test]
async fn test_keys_filters_by_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKvStore::new(dir.path());
    store.put("@streambox/theme", "\"auto\"".to_string()).await.unwrap();
    store.put("@streambox/favorites", "[]".to_string()).await.unwrap();
    store.put("@other/theme", "\"dark\"".to_string()).await.unwrap();

    let mut keys = store.keys("@streambox/").await.unwrap();
    keys.sort();

    assert_eq!(keys, vec!["@streambox/favorites", "@streambox/theme"]);
}

#[tokio::test]
async fn test_clear_leaves_foreign_keys_alone() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(FileKvStore::new(dir.path()));
    backend.put("@other/theme", "\"dark\"".to_string()).await.unwrap();

    let storage = PersistentStore::new(backend.clone());
    storage.put("theme", &ThemePreference::Light).await.unwrap();
    storage.clear().await.unwrap();

    assert_eq!(storage.get::<ThemePreference>("theme").await, None);
    assert_eq!(backend.get("@other/theme").await.unwrap().as_deref(), Some("\"dark\""));
}

#[tokio::test]
async fn test_client_state_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let env = || {
        AppEnvironment::new(
            Arc::new(MockIdentity::new()),
            Arc::new(MockCatalog::new()),
            Arc::new(FileKvStore::new(dir.path())),
        )
    };

    let first = StreamBox::new(env());
    first.start().await.unwrap();
    first.set_theme(ThemePreference::Dark).await.unwrap();
    first.dispatch(FavoritesAction::Add(MovieId(42))).await.unwrap();
    first.settle(Duration::from_secs(2)).await.unwrap();

    let second = StreamBox::new(env());
    second.start().await.unwrap();
    let state = second.snapshot().await;

    assert_eq!(state.theme.preference, ThemePreference::Dark);
    assert_eq!(state.favorites.ids, vec![MovieId(42)]);
}
