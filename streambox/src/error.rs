//! Error types for the StreamBox client.
//!
//! Errors that travel inside actions are `Clone + PartialEq` so slices can be
//! tested by comparing whole actions. Their `Display` output is the message
//! shown to the user.

use thiserror::Error;

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Failures of the identity backend (login/register).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Username/password pair rejected by the backend.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Registration payload rejected by the backend.
    #[error("Registration rejected: {0}")]
    Validation(String),

    /// Transport failure or timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with an unexpected status or body.
    #[error("Server error: {0}")]
    Server(String),
}

impl AuthError {
    /// Whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Server(_))
    }
}

/// Failures of the movie catalog backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The requested movie does not exist.
    #[error("Movie not found")]
    NotFound,

    /// Transport failure or timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with an unexpected status or an undecodable body.
    #[error("Server error: {0}")]
    Server(String),
}

/// Failures of the persistent key-value store.
///
/// These never reach the UI: callers log them and fall back to a default.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Device I/O failed.
    #[error("Storage I/O error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

/// Invalid client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be used.
    #[error("Invalid value {value:?} for {var}: {reason}")]
    Invalid {
        /// Variable name
        var: String,
        /// Offending value
        value: String,
        /// What is wrong with it
        reason: String,
    },

    /// No data directory configured and none could be derived.
    #[error("No data directory available; set STREAMBOX_DATA_DIR")]
    MissingDataDir,

    /// The HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    HttpClient(String),
}
