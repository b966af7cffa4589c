//! Identity backend trait.

use crate::error::AuthError;
use crate::state::Session;
use futures::future::BoxFuture;
use serde::Serialize;

/// Registration payload sent to the identity backend.
///
/// Built from a validated [`crate::validation::RegisterForm`]; the password
/// confirmation never leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Desired username
    pub username: String,
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// Optional first name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Optional last name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Login and registration against the identity backend.
pub trait IdentityClient: Send + Sync {
    /// Exchange credentials for a verified session.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidCredentials`]: backend rejected the pair
    /// - [`AuthError::Network`] / [`AuthError::Server`]: transport or backend failure
    fn login<'a>(&'a self, username: &'a str, password: &'a str) -> BoxFuture<'a, Result<Session, AuthError>>;

    /// Create an account.
    ///
    /// The backend issues no token for new accounts, so the returned session
    /// is [`crate::state::SessionKind::Unverified`].
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`]: backend rejected the payload
    /// - [`AuthError::Network`] / [`AuthError::Server`]: transport or backend failure
    fn register<'a>(&'a self, registration: &'a Registration) -> BoxFuture<'a, Result<Session, AuthError>>;
}
