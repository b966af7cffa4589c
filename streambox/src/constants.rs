//! Constants shared across the client.

use std::time::Duration;

/// Namespace prefix of every key this application owns in the key-value store.
pub const STORAGE_NAMESPACE: &str = "@streambox/";

/// Persisted auth token (JSON string).
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Persisted user profile (JSON object).
pub const USER_PROFILE_KEY: &str = "user_data";

/// Persisted favorite movie ids (JSON array of integers).
pub const FAVORITES_KEY: &str = "favorites";

/// Persisted theme preference (`"light"`, `"dark"` or `"auto"`).
pub const THEME_KEY: &str = "theme";

/// File name of the on-disk key-value document.
pub const STORE_FILE_NAME: &str = "streambox-store.json";

/// Default identity (login/register) backend.
pub const DEFAULT_IDENTITY_URL: &str = "https://dummyjson.com";

/// Default movie catalog backend.
pub const DEFAULT_CATALOG_URL: &str = "https://api.themoviedb.org/3";

/// Default image CDN base.
pub const DEFAULT_IMAGE_URL: &str = "https://image.tmdb.org/t/p";

/// Poster shown when a movie has no poster path.
pub const PLACEHOLDER_POSTER_URL: &str = "https://via.placeholder.com/342x513?text=No+Image";

/// Backdrop shown when a movie has no backdrop path.
pub const PLACEHOLDER_BACKDROP_URL: &str = "https://via.placeholder.com/1280x720?text=No+Image";

/// Search queries shorter than this (after trimming) never reach the network.
pub const MIN_SEARCH_LEN: usize = 2;

/// Upper bound for any single network call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Concurrent detail fetches when refreshing favorites.
pub const DEFAULT_FAVORITES_CONCURRENCY: usize = 4;
