//! Sign-in, registration and sign-out through the client facade.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::sync::Arc;
use std::time::Duration;
use streambox::mocks::{InMemoryKvStore, MockCatalog, MockIdentity};
use streambox::validation::Field;
use streambox::{AppEnvironment, AuthError, RegisterForm, Route, SessionKind, StreamBox};
use streambox_core::FetchStatus;
use streambox_testing::helpers::init_test_tracing;

const SETTLE: Duration = Duration::from_secs(2);

fn client(identity: &MockIdentity, kv: &InMemoryKvStore) -> StreamBox {
    init_test_tracing();
    StreamBox::new(AppEnvironment::new(
        Arc::new(identity.clone()),
        Arc::new(MockCatalog::new()),
        Arc::new(kv.clone()),
    ))
}

#[tokio::test]
async fn test_login_signs_in_and_writes_through() {
    let identity = MockIdentity::new();
    let kv = InMemoryKvStore::new();
    let client = client(&identity, &kv);
    assert_eq!(client.start().await.unwrap(), Route::Auth);

    client.login("emilys", "emilyspass").await.unwrap();
    client.settle(SETTLE).await.unwrap();

    assert_eq!(client.route().await, Route::Main);
    let session = client.select(|s| s.auth.current().cloned()).await.unwrap();
    assert_eq!(session.user.username, "emilys");
    assert_eq!(session.kind, SessionKind::Verified);
    assert_eq!(kv.raw("@streambox/auth_token").as_deref(), Some("\"mock-token-1\""));
    assert!(kv.raw("@streambox/user_data").unwrap().contains("\"username\":\"emilys\""));
}

#[tokio::test]
async fn test_wrong_password_fails_without_touching_storage() {
    let identity = MockIdentity::new();
    let kv = InMemoryKvStore::new();
    let client = client(&identity, &kv);
    client.start().await.unwrap();

    client.login("emilys", "wrongpass").await.unwrap();
    client.settle(SETTLE).await.unwrap();

    let auth = client.select(|s| s.auth.clone()).await;
    assert_eq!(auth.session.status(), FetchStatus::Failed);
    assert_eq!(auth.session.error(), Some(AuthError::InvalidCredentials.to_string().as_str()));
    assert!(!auth.is_authenticated());
    assert!(kv.is_empty());
    assert_eq!(client.route().await, Route::Auth);
}

#[tokio::test]
async fn test_invalid_form_never_reaches_the_backend() {
    let identity = MockIdentity::new();
    let client = client(&identity, &InMemoryKvStore::new());
    client.start().await.unwrap();

    client.login("em", "").await.unwrap();
    client.settle(SETTLE).await.unwrap();

    let fields: Vec<Field> = client
        .select(|s| s.auth.field_errors.iter().map(|e| e.field).collect())
        .await;
    assert_eq!(fields, vec![Field::Username, Field::Password]);
    assert_eq!(identity.login_calls(), 0);
}

#[tokio::test]
async fn test_registration_survives_restart_as_unverified() {
    let identity = MockIdentity::new();
    let kv = InMemoryKvStore::new();
    let first = client(&identity, &kv);
    first.start().await.unwrap();

    first
        .register(RegisterForm {
            username: " moviefan ".into(),
            email: "fan@example.com".into(),
            password: "Secret1".into(),
            confirm_password: "Secret1".into(),
            first_name: Some("Movie".into()),
            last_name: None,
        })
        .await
        .unwrap();
    first.settle(SETTLE).await.unwrap();
    assert_eq!(first.route().await, Route::Main);

    let second = client(&identity, &kv);
    assert_eq!(second.start().await.unwrap(), Route::Main);
    let session = second.select(|s| s.auth.current().cloned()).await.unwrap();
    assert_eq!(session.user.username, "moviefan");
    assert_eq!(session.kind, SessionKind::Unverified);
}

#[tokio::test]
async fn test_logout_forgets_the_session() {
    let identity = MockIdentity::new();
    let kv = InMemoryKvStore::new();
    let client = client(&identity, &kv);
    client.start().await.unwrap();
    client.login("emilys", "emilyspass").await.unwrap();
    client.settle(SETTLE).await.unwrap();

    client.logout().await.unwrap();
    assert_eq!(client.route().await, Route::Auth);
    client.settle(SETTLE).await.unwrap();

    assert_eq!(kv.raw("@streambox/auth_token"), None);
    assert_eq!(kv.raw("@streambox/user_data"), None);

    let restarted = self::client(&identity, &kv);
    assert_eq!(restarted.start().await.unwrap(), Route::Auth);
}

#[tokio::test]
async fn test_logout_wins_over_a_late_login_response() {
    let identity = MockIdentity::new().with_delay(Duration::from_millis(100));
    let kv = InMemoryKvStore::new();
    let client = client(&identity, &kv);
    client.start().await.unwrap();

    client.login("emilys", "emilyspass").await.unwrap();
    client.logout().await.unwrap();
    client.settle(SETTLE).await.unwrap();

    assert_eq!(client.route().await, Route::Auth);
    assert_eq!(kv.raw("@streambox/auth_token"), None);
}
