//! Scripted identity backend.

use super::lock;
use crate::error::AuthError;
use crate::providers::{IdentityClient, Registration};
use crate::state::{AuthToken, Session, SessionKind, UserProfile, UNVERIFIED_TOKEN_PREFIX};
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug)]
struct Account {
    password: String,
    profile: UserProfile,
}

#[derive(Debug, Default)]
struct Backend {
    accounts: HashMap<String, Account>,
    next_id: u64,
    failure: Option<AuthError>,
    delay: Option<Duration>,
    login_calls: usize,
    register_calls: usize,
}

/// In-memory identity backend.
///
/// Starts with the demo account `emilys` / `emilyspass`.
#[derive(Debug, Clone)]
pub struct MockIdentity {
    backend: Arc<Mutex<Backend>>,
}

impl Default for MockIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIdentity {
    /// Backend holding the demo account.
    #[must_use]
    pub fn new() -> Self {
        let identity = Self {
            backend: Arc::new(Mutex::new(Backend {
                next_id: 2,
                ..Backend::default()
            })),
        };
        identity.insert_account(
            "emilyspass",
            UserProfile {
                id: 1,
                username: "emilys".to_string(),
                email: "emily.johnson@x.dummyjson.com".to_string(),
                first_name: Some("Emily".to_string()),
                last_name: Some("Johnson".to_string()),
                image: Some("https://dummyjson.com/icon/emilys/128".to_string()),
            },
        );
        identity
    }

    /// Add an account.
    pub fn insert_account(&self, password: &str, profile: UserProfile) {
        lock(&self.backend).accounts.insert(
            profile.username.clone(),
            Account {
                password: password.to_string(),
                profile,
            },
        );
    }

    /// Fail every call with `error` (for testing).
    #[must_use]
    pub fn with_failure(self, error: AuthError) -> Self {
        lock(&self.backend).failure = Some(error);
        self
    }

    /// Delay every answer (for testing).
    #[must_use]
    pub fn with_delay(self, delay: Duration) -> Self {
        lock(&self.backend).delay = Some(delay);
        self
    }

    /// Number of `login` calls received.
    #[must_use]
    pub fn login_calls(&self) -> usize {
        lock(&self.backend).login_calls
    }

    /// Number of `register` calls received.
    #[must_use]
    pub fn register_calls(&self) -> usize {
        lock(&self.backend).register_calls
    }

    fn answer(
        delay: Option<Duration>,
        result: Result<Session, AuthError>,
    ) -> BoxFuture<'static, Result<Session, AuthError>> {
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        }
        .boxed()
    }
}

impl IdentityClient for MockIdentity {
    fn login<'a>(&'a self, username: &'a str, password: &'a str) -> BoxFuture<'a, Result<Session, AuthError>> {
        let mut backend = lock(&self.backend);
        backend.login_calls += 1;

        let result = match (&backend.failure, backend.accounts.get(username)) {
            (Some(error), _) => Err(error.clone()),
            (None, Some(account)) if account.password == password => Ok(Session {
                user: account.profile.clone(),
                token: AuthToken::new(format!("mock-token-{}", account.profile.id)),
                kind: SessionKind::Verified,
            }),
            (None, _) => Err(AuthError::InvalidCredentials),
        };

        Self::answer(backend.delay, result)
    }

    fn register<'a>(&'a self, registration: &'a Registration) -> BoxFuture<'a, Result<Session, AuthError>> {
        let mut backend = lock(&self.backend);
        backend.register_calls += 1;

        if let Some(error) = backend.failure.clone() {
            return Self::answer(backend.delay, Err(error));
        }
        if backend.accounts.contains_key(&registration.username) {
            return Self::answer(
                backend.delay,
                Err(AuthError::Validation("Username already taken".to_string())),
            );
        }

        let id = backend.next_id;
        backend.next_id += 1;

        let profile = UserProfile {
            id,
            username: registration.username.clone(),
            email: registration.email.clone(),
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
            image: None,
        };
        backend.accounts.insert(
            registration.username.clone(),
            Account {
                password: registration.password.clone(),
                profile: profile.clone(),
            },
        );

        let session = Session {
            user: profile,
            token: AuthToken::new(format!("{UNVERIFIED_TOKEN_PREFIX}mock-{id}")),
            kind: SessionKind::Unverified,
        };
        Self::answer(backend.delay, Ok(session))
    }
}
