//! HTTP implementations of the remote clients.

pub mod catalog;
pub mod identity;

pub use catalog::HttpCatalogClient;
pub use identity::HttpIdentityClient;

use crate::error::ConfigError;
use serde::Deserialize;
use std::time::Duration;

/// Build the shared reqwest client with a per-request timeout.
///
/// # Errors
///
/// Returns [`ConfigError::HttpClient`] if the TLS backend cannot be initialized.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("streambox/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ConfigError::HttpClient(e.to_string()))
}

/// Describe a transport failure for the user.
pub(crate) fn transport_message(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "could not reach the server".to_string()
    } else {
        error.to_string()
    }
}

/// Error body shapes of both backends.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default, alias = "status_message")]
    pub message: Option<String>,
}

/// Best-effort message out of an error response.
pub(crate) async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
