//! Identity backend over HTTP.
//!
//! - `POST {base}/auth/login` with `{username, password}`
//! - `POST {base}/users/add` with the registration payload
//!
//! The registration endpoint issues no token, so the client synthesizes an
//! unverified one (see [`SessionKind::Unverified`]).

use super::{error_message, transport_message};
use crate::error::AuthError;
use crate::providers::{IdentityClient, Registration};
use crate::state::{AuthToken, Session, SessionKind, UserProfile, UNVERIFIED_TOKEN_PREFIX};
use futures::future::{BoxFuture, FutureExt};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use streambox_core::environment::{Clock, SystemClock};

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Login answer: the profile plus a token under either name.
#[derive(Deserialize)]
struct LoginResponse {
    #[serde(flatten)]
    profile: UserProfile,
    #[serde(default)]
    token: Option<String>,
    #[serde(default, rename = "accessToken")]
    access_token: Option<String>,
}

/// Identity client for a dummyjson-compatible backend.
#[derive(Clone)]
pub struct HttpIdentityClient {
    client: Client,
    base_url: String,
    clock: Arc<dyn Clock>,
}

impl HttpIdentityClient {
    /// Client for the backend at `base_url`.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Clock used to stamp synthesized tokens.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    async fn post_login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(format!("{}/auth/login", self.base_url))
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|e| AuthError::Network(transport_message(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            tracing::debug!(status = status.as_u16(), %message, "Login rejected");
            return Err(match status {
                StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    AuthError::InvalidCredentials
                },
                _ => AuthError::Server(message),
            });
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Server(format!("invalid login response: {e}")))?;

        let token = body
            .token
            .or(body.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Server("login response carried no token".to_string()))?;

        Ok(Session {
            user: body.profile,
            token: AuthToken::new(token),
            kind: SessionKind::Verified,
        })
    }

    async fn post_registration(&self, registration: &Registration) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(format!("{}/users/add", self.base_url))
            .json(registration)
            .send()
            .await
            .map_err(|e| AuthError::Network(transport_message(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(if status.is_client_error() {
                AuthError::Validation(message)
            } else {
                AuthError::Server(message)
            });
        }

        let mut profile: UserProfile = response
            .json()
            .await
            .map_err(|e| AuthError::Server(format!("invalid registration response: {e}")))?;

        if profile.email.is_empty() {
            profile.email.clone_from(&registration.email);
        }

        let token = format!(
            "{UNVERIFIED_TOKEN_PREFIX}{}.{}",
            profile.id,
            self.clock.now().timestamp_millis()
        );
        tracing::info!(user_id = profile.id, "Registered account with unverified session");

        Ok(Session {
            user: profile,
            token: AuthToken::new(token),
            kind: SessionKind::Unverified,
        })
    }
}

impl IdentityClient for HttpIdentityClient {
    fn login<'a>(&'a self, username: &'a str, password: &'a str) -> BoxFuture<'a, Result<Session, AuthError>> {
        self.post_login(username, password).boxed()
    }

    fn register<'a>(&'a self, registration: &'a Registration) -> BoxFuture<'a, Result<Session, AuthError>> {
        self.post_registration(registration).boxed()
    }
}
