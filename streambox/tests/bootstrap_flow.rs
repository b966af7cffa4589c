//! Startup rehydration and the first route.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::sync::Arc;
use std::time::Duration;
use streambox::mocks::catalog::sample_movie;
use streambox::mocks::{InMemoryKvStore, MockCatalog, MockIdentity};
use streambox::{AppEnvironment, ColorScheme, MovieId, Route, SessionKind, StreamBox, ThemePreference};
use streambox_testing::helpers::init_test_tracing;

const SETTLE: Duration = Duration::from_secs(2);

const EMILY: &str = r#"{"id":1,"username":"emilys","email":"emily.johnson@x.dummyjson.com","firstName":"Emily","lastName":"Johnson"}"#;

fn client(catalog: &MockCatalog, kv: &InMemoryKvStore) -> StreamBox {
    init_test_tracing();
    StreamBox::new(
        AppEnvironment::new(
            Arc::new(MockIdentity::new()),
            Arc::new(catalog.clone()),
            Arc::new(kv.clone()),
        )
        .with_system_appearance(ColorScheme::Dark),
    )
}

#[tokio::test]
async fn test_empty_store_starts_signed_out_with_defaults() {
    let kv = InMemoryKvStore::new();
    let client = client(&MockCatalog::new(), &kv);

    assert_eq!(client.route().await, Route::Splash);
    assert_eq!(client.start().await.unwrap(), Route::Auth);

    let state = client.snapshot().await;
    assert_eq!(state.theme.preference, ThemePreference::Auto);
    assert_eq!(state.theme.resolved(), ColorScheme::Dark);
    assert!(state.favorites.ids.is_empty());
}

#[tokio::test]
async fn test_stored_session_goes_straight_to_main() {
    let kv = InMemoryKvStore::new();
    kv.insert_raw("@streambox/auth_token", "\"token-abc\"");
    kv.insert_raw("@streambox/user_data", EMILY);
    let client = client(&MockCatalog::new(), &kv);

    assert_eq!(client.start().await.unwrap(), Route::Main);
    let session = client.select(|s| s.auth.current().cloned()).await.unwrap();
    assert_eq!(session.user.display_name(), "Emily Johnson");
    assert_eq!(session.kind, SessionKind::Verified);
}

#[tokio::test]
async fn test_corrupted_token_starts_signed_out() {
    let kv = InMemoryKvStore::new();
    kv.insert_raw("@streambox/auth_token", "{not json");
    kv.insert_raw("@streambox/user_data", EMILY);
    let client = client(&MockCatalog::new(), &kv);

    assert_eq!(client.start().await.unwrap(), Route::Auth);
}

#[tokio::test]
async fn test_blank_token_is_rejected() {
    let kv = InMemoryKvStore::new();
    kv.insert_raw("@streambox/auth_token", "\"  \"");
    kv.insert_raw("@streambox/user_data", EMILY);
    let client = client(&MockCatalog::new(), &kv);

    assert_eq!(client.start().await.unwrap(), Route::Auth);
}

#[tokio::test]
async fn test_unreadable_store_falls_back_to_defaults() {
    let kv = InMemoryKvStore::new();
    kv.insert_raw("@streambox/theme", "\"light\"");
    kv.fail_reads(true);
    let client = client(&MockCatalog::new(), &kv);

    assert_eq!(client.start().await.unwrap(), Route::Auth);
    assert_eq!(client.color_scheme().await, ColorScheme::Dark);
}

#[tokio::test]
async fn test_theme_is_restored_and_wins_over_the_host() {
    let kv = InMemoryKvStore::new();
    kv.insert_raw("@streambox/theme", "\"light\"");
    let client = client(&MockCatalog::new(), &kv);

    client.start().await.unwrap();
    assert_eq!(client.color_scheme().await, ColorScheme::Light);

    client.set_theme(ThemePreference::Auto).await.unwrap();
    assert_eq!(client.color_scheme().await, ColorScheme::Dark);
    client.system_appearance_changed(ColorScheme::Light).await.unwrap();
    assert_eq!(client.color_scheme().await, ColorScheme::Light);

    client.settle(SETTLE).await.unwrap();
    assert_eq!(kv.raw("@streambox/theme").as_deref(), Some("\"auto\""));
}

#[tokio::test]
async fn test_stored_favorites_are_refreshed_on_start() {
    let catalog = MockCatalog::new().with_movie(sample_movie(11, "Arrival")).with_movie(sample_movie(12, "Dune"));
    let kv = InMemoryKvStore::new();
    kv.insert_raw("@streambox/favorites", "[12,11,12]");
    let client = client(&catalog, &kv);

    client.start().await.unwrap();
    client.settle(SETTLE).await.unwrap();

    let favorites = client.select(|s| s.favorites.clone()).await;
    assert_eq!(favorites.ids, vec![MovieId(12), MovieId(11)]);
    let titles: Vec<String> = favorites.movies.data.iter().map(|m| m.summary.title.clone()).collect();
    assert_eq!(titles, vec!["Dune", "Arrival"]);
    assert_eq!(catalog.calls().detail, 2);
}

#[tokio::test]
async fn test_start_twice_rehydrates_once() {
    let kv = InMemoryKvStore::new();
    kv.insert_raw("@streambox/favorites", "[1]");
    let catalog = MockCatalog::new().with_movie(sample_movie(1, "A"));
    let client = client(&catalog, &kv);

    let (first, second) = tokio::join!(client.start(), client.start());
    assert_eq!(first.unwrap(), Route::Auth);
    assert_eq!(second.unwrap(), Route::Auth);
    client.settle(SETTLE).await.unwrap();

    assert_eq!(catalog.calls().detail, 1);
}
