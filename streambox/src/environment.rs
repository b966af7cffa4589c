//! Environment injected into every reducer.

use crate::config::ClientConfig;
use crate::constants::{
    AUTH_TOKEN_KEY, DEFAULT_FAVORITES_CONCURRENCY, DEFAULT_IMAGE_URL, DEFAULT_REQUEST_TIMEOUT,
    FAVORITES_KEY, THEME_KEY, USER_PROFILE_KEY,
};
use crate::error::ConfigError;
use crate::http::{HttpCatalogClient, HttpIdentityClient, build_http_client};
use crate::movie::MovieId;
use crate::providers::{CatalogClient, IdentityClient, KeyValueStore};
use crate::state::{AuthToken, ColorScheme, ThemePreference, UserProfile};
use crate::stores::{FileKvStore, PersistedValue, PersistentStore};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// The four keys written through by the slices.
///
/// Each key is owned by exactly one slice: auth owns `token` and `profile`,
/// favorites owns `favorites`, theme owns `theme`.
#[derive(Debug, Clone)]
pub struct PersistedKeys {
    /// Auth token (JSON string)
    pub token: PersistedValue<AuthToken>,
    /// Signed-in user (JSON object)
    pub profile: PersistedValue<UserProfile>,
    /// Favorite movie ids (JSON array of integers)
    pub favorites: PersistedValue<Vec<MovieId>>,
    /// Theme preference (`"light" | "dark" | "auto"`)
    pub theme: PersistedValue<ThemePreference>,
}

impl PersistedKeys {
    /// Keys over `storage`.
    #[must_use]
    pub fn new(storage: &PersistentStore) -> Self {
        Self {
            token: PersistedValue::new(storage.clone(), AUTH_TOKEN_KEY)
                .with_validator(|token| !token.as_str().trim().is_empty()),
            profile: PersistedValue::new(storage.clone(), USER_PROFILE_KEY)
                .with_validator(|user| !user.username.is_empty()),
            favorites: PersistedValue::new(storage.clone(), FAVORITES_KEY),
            theme: PersistedValue::new(storage.clone(), THEME_KEY),
        }
    }
}

/// Collaborators and tunables of the client.
#[derive(Clone)]
pub struct AppEnvironment {
    /// Identity backend
    pub identity: Arc<dyn IdentityClient>,
    /// Movie catalog
    pub catalog: Arc<dyn CatalogClient>,
    /// Namespaced JSON storage
    pub storage: PersistentStore,
    /// Write-through keys
    pub persisted: PersistedKeys,
    /// Upper bound of any single network call
    pub request_timeout: Duration,
    /// Concurrent detail fetches when refreshing favorites
    pub favorites_concurrency: usize,
    /// Host appearance at startup
    pub system_appearance: ColorScheme,
    /// Image CDN base
    pub image_url: String,
}

impl std::fmt::Debug for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEnvironment")
            .field("storage", &self.storage)
            .field("request_timeout", &self.request_timeout)
            .field("favorites_concurrency", &self.favorites_concurrency)
            .field("system_appearance", &self.system_appearance)
            .finish_non_exhaustive()
    }
}

impl AppEnvironment {
    /// Environment over the given collaborators with default tunables.
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityClient>,
        catalog: Arc<dyn CatalogClient>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let storage = PersistentStore::new(store);
        let persisted = PersistedKeys::new(&storage);

        Self {
            identity,
            catalog,
            storage,
            persisted,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            favorites_concurrency: DEFAULT_FAVORITES_CONCURRENCY,
            system_appearance: ColorScheme::Light,
            image_url: DEFAULT_IMAGE_URL.to_string(),
        }
    }

    /// HTTP clients and the file store, as described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the HTTP client cannot be built or no data
    /// directory is available.
    pub fn production(config: &ClientConfig) -> Result<Self, ConfigError> {
        let http = build_http_client(config.request_timeout)?;
        let data_dir = config.resolved_data_dir()?;

        tracing::info!(
            identity = %config.identity_url,
            catalog = %config.catalog_url,
            data_dir = %data_dir.display(),
            "Building production environment"
        );

        let identity = HttpIdentityClient::new(http.clone(), config.identity_url.clone());
        let catalog = HttpCatalogClient::new(http, config.catalog_url.clone(), config.catalog_api_key.clone());

        Ok(Self::new(Arc::new(identity), Arc::new(catalog), Arc::new(FileKvStore::new(data_dir)))
            .with_request_timeout(config.request_timeout)
            .with_favorites_concurrency(config.favorites_concurrency)
            .with_system_appearance(config.appearance)
            .with_image_url(config.image_url.clone()))
    }

    /// Bound every network call by `timeout`.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Fetch at most `limit` favorite details at once (at least 1).
    #[must_use]
    pub fn with_favorites_concurrency(mut self, limit: usize) -> Self {
        self.favorites_concurrency = limit.max(1);
        self
    }

    /// Host appearance at startup.
    #[must_use]
    pub const fn with_system_appearance(mut self, scheme: ColorScheme) -> Self {
        self.system_appearance = scheme;
        self
    }

    /// Image CDN base.
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }
}

/// Run `fut`, settling as `timed_out` if it exceeds `limit`.
pub(crate) async fn bounded<T, Err, F>(limit: Duration, fut: F, timed_out: Err) -> Result<T, Err>
where
    F: Future<Output = Result<T, Err>>,
{
    tokio::time::timeout(limit, fut).await.unwrap_or(Err(timed_out))
}
