//! Auth slice reducer.
//!
//! # Flow
//!
//! 1. `Login` / `Register` are validated locally; failures become field
//!    messages and never reach the network
//! 2. A valid intent starts a request on the session resource (coalesced per
//!    username) and calls the identity backend
//! 3. The answer commits only if it is still current; a success is written
//!    through to the token and profile keys
//! 4. `Logout` drops the session at once and then removes both keys; a
//!    failed attempt while signed in does the same
//!
//! Writes carry the slice revision, so a logout's removal can never land on
//! top of a later login.

use crate::actions::AuthAction;
use crate::environment::{AppEnvironment, PersistedKeys, bounded};
use crate::error::AuthError;
use crate::providers::Registration;
use crate::state::{AuthState, Session};
use crate::validation::{RegisterForm, validate_login, validate_registration};
use streambox_core::effect::Effect;
use streambox_core::reducer::Reducer;
use streambox_core::{RequestSeq, SmallVec, smallvec};

/// Auth slice reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthReducer;

impl AuthReducer {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn complete(
        state: &mut AuthState,
        seq: RequestSeq,
        result: Result<Session, AuthError>,
        env: &AppEnvironment,
    ) -> SmallVec<[Effect<AuthAction>; 4]> {
        match result {
            Ok(session) => {
                if !state.session.resolve(seq, Some(session.clone())) {
                    tracing::debug!(%seq, "Discarding stale auth response");
                    return smallvec![Effect::None];
                }

                state.revision += 1;
                tracing::info!(
                    user_id = session.user_id(),
                    kind = ?session.kind,
                    "Signed in"
                );

                let keys = env.persisted.clone();
                let revision = state.revision;
                smallvec![Effect::Future(Box::pin(async move {
                    persist_session(&keys, revision, &session).await;
                    None
                }))]
            },
            Err(error) => {
                if !state.session.reject(seq, error.to_string()) {
                    tracing::debug!(%seq, "Discarding stale auth failure");
                    return smallvec![Effect::None];
                }
                tracing::info!(%error, "Authentication failed");

                // A failed attempt never leaves the previous user signed in.
                if state.session.data.take().is_none() {
                    return smallvec![Effect::None];
                }
                state.revision += 1;
                tracing::info!("Dropped previous session after failed sign-in");

                let keys = env.persisted.clone();
                let revision = state.revision;
                smallvec![Effect::Future(Box::pin(async move {
                    clear_session(&keys, revision).await;
                    Some(AuthAction::SessionCleared)
                }))]
            },
        }
    }
}

fn registration_from(form: RegisterForm) -> Registration {
    let optional = |value: Option<String>| value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    Registration {
        username: form.username.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password,
        first_name: optional(form.first_name),
        last_name: optional(form.last_name),
    }
}

async fn persist_session(keys: &PersistedKeys, revision: u64, session: &Session) {
    let (token, profile) = tokio::join!(
        keys.token.save(revision, &session.token),
        keys.profile.save(revision, &session.user),
    );

    for (key, result) in [(keys.token.key(), token), (keys.profile.key(), profile)] {
        if let Err(error) = result {
            tracing::warn!(key, %error, "Session write failed, keeping in-memory session");
        }
    }
}

async fn clear_session(keys: &PersistedKeys, revision: u64) {
    let (token, profile) = tokio::join!(keys.token.clear(revision), keys.profile.clear(revision));

    for (key, result) in [(keys.token.key(), token), (keys.profile.key(), profile)] {
        if let Err(error) = result {
            tracing::warn!(key, %error, "Failed to remove persisted session key");
        }
    }
}

impl Reducer for AuthReducer {
    type State = AuthState;
    type Action = AuthAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Login: validate, then ask the identity backend
            // ═══════════════════════════════════════════════════════════════
            AuthAction::Login { username, password } => {
                let errors = validate_login(&username, &password);
                if !errors.is_empty() {
                    state.field_errors = errors;
                    return smallvec![Effect::None];
                }
                state.field_errors.clear();

                let username = username.trim().to_string();
                let Some(seq) = state.session.begin(format!("login:{username}")) else {
                    tracing::debug!(%username, "Login already in flight");
                    return smallvec![Effect::None];
                };

                let identity = env.identity.clone();
                let timeout = env.request_timeout;
                smallvec![Effect::Future(Box::pin(async move {
                    let result = bounded(
                        timeout,
                        identity.login(&username, &password),
                        AuthError::Network("request timed out".to_string()),
                    )
                    .await;
                    Some(AuthAction::LoginCompleted { seq, result })
                }))]
            },

            // ═══════════════════════════════════════════════════════════════
            // Register: validate, then create the account
            // ═══════════════════════════════════════════════════════════════
            AuthAction::Register(form) => {
                let errors = validate_registration(&form);
                if !errors.is_empty() {
                    state.field_errors = errors;
                    return smallvec![Effect::None];
                }
                state.field_errors.clear();

                let registration = registration_from(form);
                let Some(seq) = state.session.begin(format!("register:{}", registration.username)) else {
                    tracing::debug!(username = %registration.username, "Registration already in flight");
                    return smallvec![Effect::None];
                };

                let identity = env.identity.clone();
                let timeout = env.request_timeout;
                smallvec![Effect::Future(Box::pin(async move {
                    let result = bounded(
                        timeout,
                        identity.register(&registration),
                        AuthError::Network("request timed out".to_string()),
                    )
                    .await;
                    Some(AuthAction::RegisterCompleted { seq, result })
                }))]
            },

            AuthAction::LoginCompleted { seq, result } | AuthAction::RegisterCompleted { seq, result } => {
                Self::complete(state, seq, result, env)
            },

            // ═══════════════════════════════════════════════════════════════
            // Logout: forget the session now, remove the keys afterwards
            // ═══════════════════════════════════════════════════════════════
            AuthAction::Logout => {
                state.session.cancel();
                state.session.data = None;
                state.field_errors.clear();
                state.revision += 1;

                tracing::info!("Signed out");

                let keys = env.persisted.clone();
                let revision = state.revision;
                smallvec![Effect::Future(Box::pin(async move {
                    clear_session(&keys, revision).await;
                    Some(AuthAction::SessionCleared)
                }))]
            },

            AuthAction::SessionCleared => {
                tracing::debug!("Persisted session removed");
                smallvec![Effect::None]
            },

            AuthAction::ClearError => {
                state.session.clear_error();
                state.field_errors.clear();
                smallvec![Effect::None]
            },
        }
    }
}
