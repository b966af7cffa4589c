//! Client configuration.
//!
//! Values come from the builder or from `STREAMBOX_*` environment variables.
//! Nothing here is hardcoded into the slices; the environment is built from
//! a [`ClientConfig`].

use crate::constants::{
    DEFAULT_CATALOG_URL, DEFAULT_FAVORITES_CONCURRENCY, DEFAULT_IDENTITY_URL, DEFAULT_IMAGE_URL,
    DEFAULT_REQUEST_TIMEOUT,
};
use crate::error::ConfigError;
use crate::state::ColorScheme;
use std::path::PathBuf;
use std::time::Duration;

/// Identity backend base URL.
pub const ENV_IDENTITY_URL: &str = "STREAMBOX_IDENTITY_URL";
/// Catalog API base URL.
pub const ENV_CATALOG_URL: &str = "STREAMBOX_CATALOG_URL";
/// Catalog API key.
pub const ENV_CATALOG_API_KEY: &str = "STREAMBOX_CATALOG_API_KEY";
/// Image CDN base URL.
pub const ENV_IMAGE_URL: &str = "STREAMBOX_IMAGE_URL";
/// Directory of the persistent store.
pub const ENV_DATA_DIR: &str = "STREAMBOX_DATA_DIR";
/// Per-request timeout in seconds.
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "STREAMBOX_REQUEST_TIMEOUT_SECS";
/// Concurrent detail fetches when refreshing favorites.
pub const ENV_FAVORITES_CONCURRENCY: &str = "STREAMBOX_FAVORITES_CONCURRENCY";
/// Host appearance (`light` or `dark`).
pub const ENV_APPEARANCE: &str = "STREAMBOX_APPEARANCE";

/// Configuration of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Identity backend base URL.
    ///
    /// Default: `https://dummyjson.com`
    pub identity_url: String,

    /// Catalog API base URL.
    ///
    /// Default: `https://api.themoviedb.org/3`
    pub catalog_url: String,

    /// Catalog API key, sent as the `api_key` query parameter.
    pub catalog_api_key: String,

    /// Image CDN base URL.
    pub image_url: String,

    /// Directory of the persistent store; derived from the platform data
    /// directory when unset.
    pub data_dir: Option<PathBuf>,

    /// Upper bound of any single network call.
    ///
    /// Default: 15 seconds
    pub request_timeout: Duration,

    /// Concurrent detail fetches when refreshing favorites.
    ///
    /// Default: 4
    pub favorites_concurrency: usize,

    /// Host appearance used when the theme preference is `auto`.
    pub appearance: ColorScheme,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            identity_url: DEFAULT_IDENTITY_URL.to_string(),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            catalog_api_key: String::new(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            data_dir: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            favorites_concurrency: DEFAULT_FAVORITES_CONCURRENCY,
            appearance: ColorScheme::Light,
        }
    }
}

impl ClientConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identity backend.
    #[must_use]
    pub fn with_identity_url(mut self, url: impl Into<String>) -> Self {
        self.identity_url = url.into();
        self
    }

    /// Set the catalog backend.
    #[must_use]
    pub fn with_catalog_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_url = url.into();
        self
    }

    /// Set the catalog API key.
    #[must_use]
    pub fn with_catalog_api_key(mut self, key: impl Into<String>) -> Self {
        self.catalog_api_key = key.into();
        self
    }

    /// Set the image CDN base.
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    /// Set the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the favorites fan-out limit (at least 1).
    #[must_use]
    pub const fn with_favorites_concurrency(mut self, limit: usize) -> Self {
        self.favorites_concurrency = if limit == 0 { 1 } else { limit };
        self
    }

    /// Set the host appearance.
    #[must_use]
    pub const fn with_appearance(mut self, appearance: ColorScheme) -> Self {
        self.appearance = appearance;
        self
    }

    /// Read the configuration from `STREAMBOX_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unparseable or out-of-range values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`ClientConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unparseable or out-of-range values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_IDENTITY_URL) {
            config.identity_url = url;
        }
        if let Some(url) = get(ENV_CATALOG_URL) {
            config.catalog_url = url;
        }
        if let Some(key) = get(ENV_CATALOG_API_KEY) {
            config.catalog_api_key = key;
        }
        if let Some(url) = get(ENV_IMAGE_URL) {
            config.image_url = url;
        }
        if let Some(dir) = get(ENV_DATA_DIR) {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = get(ENV_REQUEST_TIMEOUT_SECS) {
            let secs = parse_positive(ENV_REQUEST_TIMEOUT_SECS, &raw)?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = get(ENV_FAVORITES_CONCURRENCY) {
            let limit = parse_positive(ENV_FAVORITES_CONCURRENCY, &raw)?;
            config.favorites_concurrency = usize::try_from(limit).unwrap_or(usize::MAX);
        }
        if let Some(raw) = get(ENV_APPEARANCE) {
            config.appearance = raw.parse().map_err(|reason| ConfigError::Invalid {
                var: ENV_APPEARANCE.to_string(),
                value: raw.clone(),
                reason,
            })?;
        }

        Ok(config)
    }

    /// Directory of the persistent store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDataDir`] if none is configured and the
    /// platform has no data directory.
    pub fn resolved_data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join("streambox"))
                .ok_or(ConfigError::MissingDataDir),
        }
    }
}

fn parse_positive(var: &str, raw: &str) -> Result<u64, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        var: var.to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    match raw.parse::<u64>() {
        Ok(0) => Err(invalid("must be greater than zero")),
        Ok(value) => Ok(value),
        Err(_) => Err(invalid("not a positive integer")),
    }
}
