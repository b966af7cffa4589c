//! Client state.
//!
//! One struct per slice plus the [`AppState`] aggregate owned by the Store.

use crate::movie::{MovieDetail, MovieId, MoviePage};
use crate::providers::ListKind;
use crate::validation::FieldError;
use serde::{Deserialize, Serialize};
use streambox_core::ResourceState;

/// Prefix of tokens synthesized locally for registered accounts.
pub const UNVERIFIED_TOKEN_PREFIX: &str = "unverified.";

// ═══════════════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════════════

/// Bearer token issued by (or synthesized for) the identity backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a raw token.
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    /// Raw token value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Profile of the signed-in user, persisted under the user-profile key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Backend user id
    pub id: u64,
    /// Username
    pub username: String,
    /// Email address
    #[serde(default)]
    pub email: String,
    /// First name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name
    #[serde(default)]
    pub last_name: Option<String>,
    /// Avatar URL
    #[serde(default)]
    pub image: Option<String>,
}

impl UserProfile {
    /// Full name if known, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.to_string(),
            (None, None) => self.username.clone(),
        }
    }
}

/// Whether the token was issued by the identity backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Token issued by the backend on login
    Verified,
    /// Token synthesized locally after registration; not accepted by the backend
    Unverified,
}

impl SessionKind {
    /// Classify a persisted token.
    #[must_use]
    pub fn of(token: &AuthToken) -> Self {
        if token.as_str().starts_with(UNVERIFIED_TOKEN_PREFIX) {
            Self::Unverified
        } else {
            Self::Verified
        }
    }
}

/// An authenticated session. User and token always travel together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Signed-in user
    pub user: UserProfile,
    /// Bearer token
    pub token: AuthToken,
    /// Provenance of the token
    pub kind: SessionKind,
}

impl Session {
    /// Build a session from persisted parts.
    #[must_use]
    pub fn restore(user: UserProfile, token: AuthToken) -> Self {
        let kind = SessionKind::of(&token);
        Self { user, token, kind }
    }

    /// User id.
    #[must_use]
    pub const fn user_id(&self) -> u64 {
        self.user.id
    }
}

/// Auth slice state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    /// Current session; `None` while signed out
    pub session: ResourceState<Option<Session>>,
    /// Client-side validation messages of the last submitted form
    pub field_errors: Vec<FieldError>,
    pub(crate) revision: u64,
}

impl AuthState {
    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.data.is_some()
    }

    /// Current session, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&Session> {
        self.session.data.as_ref()
    }

    /// Write-through revision of the session keys.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Movies
// ═══════════════════════════════════════════════════════════════════════

/// Movies slice state: one resource per list, plus search and the
/// currently viewed detail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoviesState {
    /// Trending list (day or week)
    pub trending: ResourceState<MoviePage>,
    /// Popular list
    pub popular: ResourceState<MoviePage>,
    /// Upcoming list
    pub upcoming: ResourceState<MoviePage>,
    /// Top rated list
    pub top_rated: ResourceState<MoviePage>,
    /// Search results
    pub search: ResourceState<MoviePage>,
    /// Trimmed query of the last search intent
    pub search_query: String,
    /// Detail of the currently viewed movie
    pub detail: ResourceState<Option<MovieDetail>>,
}

impl MoviesState {
    /// Resource backing `list`.
    #[must_use]
    pub const fn list(&self, list: ListKind) -> &ResourceState<MoviePage> {
        match list {
            ListKind::Trending(_) => &self.trending,
            ListKind::Popular => &self.popular,
            ListKind::Upcoming => &self.upcoming,
            ListKind::TopRated => &self.top_rated,
        }
    }

    pub(crate) const fn list_mut(&mut self, list: ListKind) -> &mut ResourceState<MoviePage> {
        match list {
            ListKind::Trending(_) => &mut self.trending,
            ListKind::Popular => &mut self.popular,
            ListKind::Upcoming => &mut self.upcoming,
            ListKind::TopRated => &mut self.top_rated,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Favorites
// ═══════════════════════════════════════════════════════════════════════

/// Favorites slice state.
///
/// `ids` is the source of truth. `movies` is a cache in `ids` order; every
/// movie in it is favorited, but a favorited id may be missing while its
/// detail is being fetched or after its fetch failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesState {
    /// Favorited ids in the order they were added
    pub ids: Vec<MovieId>,
    /// Details of favorited movies, in `ids` order
    pub movies: ResourceState<Vec<MovieDetail>>,
    /// Ids whose last detail fetch failed; retried on the next refresh
    pub unresolved: Vec<MovieId>,
    pub(crate) revision: u64,
}

impl FavoritesState {
    /// Whether `id` is favorited.
    #[must_use]
    pub fn is_favorite(&self, id: MovieId) -> bool {
        self.ids.contains(&id)
    }

    /// Write-through revision of the favorites key.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Theme
// ═══════════════════════════════════════════════════════════════════════

/// User's theme choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Always light
    Light,
    /// Always dark
    Dark,
    /// Follow the host appearance
    #[default]
    Auto,
}

/// Effective color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Light colors
    #[default]
    Light,
    /// Dark colors
    Dark,
}

impl ColorScheme {
    /// The other scheme.
    #[must_use]
    pub const fn inverted(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl std::str::FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("expected \"light\" or \"dark\", got {other:?}")),
        }
    }
}

/// Theme slice state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeState {
    /// Stored preference
    pub preference: ThemePreference,
    /// Host appearance, used when the preference is `Auto`
    pub system: ColorScheme,
    pub(crate) revision: u64,
}

impl ThemeState {
    /// Scheme the UI should render with.
    #[must_use]
    pub const fn resolved(&self) -> ColorScheme {
        match self.preference {
            ThemePreference::Light => ColorScheme::Light,
            ThemePreference::Dark => ColorScheme::Dark,
            ThemePreference::Auto => self.system,
        }
    }

    /// Write-through revision of the theme key.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Application
// ═══════════════════════════════════════════════════════════════════════

/// Startup progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapState {
    /// Rehydration has been requested
    pub started: bool,
    /// Rehydration finished; set exactly once
    pub initialized: bool,
}

/// Top-level screen the UI should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Still rehydrating
    Splash,
    /// Signed out: login/register
    Auth,
    /// Signed in: browsing
    Main,
}

/// Whole client state owned by the Store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Auth slice
    pub auth: AuthState,
    /// Movies slice
    pub movies: MoviesState,
    /// Favorites slice
    pub favorites: FavoritesState,
    /// Theme slice
    pub theme: ThemeState,
    /// Startup progress
    pub bootstrap: BootstrapState,
}

impl AppState {
    /// Initial state for a host whose appearance is `system`.
    #[must_use]
    pub fn new(system: ColorScheme) -> Self {
        Self {
            theme: ThemeState {
                system,
                ..ThemeState::default()
            },
            ..Self::default()
        }
    }

    /// Navigation gate: splash until rehydrated, then main iff signed in.
    #[must_use]
    pub const fn route(&self) -> Route {
        if !self.bootstrap.initialized {
            Route::Splash
        } else if self.auth.is_authenticated() {
            Route::Main
        } else {
            Route::Auth
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: 1,
            username: "emilys".into(),
            email: "emily.johnson@x.dummyjson.com".into(),
            first_name: Some("Emily".into()),
            last_name: Some("Johnson".into()),
            image: None,
        }
    }

    #[test]
    fn test_profile_uses_camel_case_on_disk() {
        let json = serde_json::to_value(profile()).unwrap();
        assert_eq!(json["firstName"], "Emily");
        assert_eq!(profile().display_name(), "Emily Johnson");
    }

    #[test]
    fn test_session_kind_from_token() {
        let restored = Session::restore(profile(), AuthToken::new("eyJhbGciOi".into()));
        assert_eq!(restored.kind, SessionKind::Verified);

        let local = Session::restore(profile(), AuthToken::new(format!("{UNVERIFIED_TOKEN_PREFIX}abc")));
        assert_eq!(local.kind, SessionKind::Unverified);
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AuthToken::new("secret".into());
        assert!(!format!("{token:?}").contains("secret"));
    }

    #[test]
    fn test_theme_resolution() {
        let mut theme = ThemeState {
            system: ColorScheme::Dark,
            ..ThemeState::default()
        };
        assert_eq!(theme.resolved(), ColorScheme::Dark);

        theme.preference = ThemePreference::Light;
        assert_eq!(theme.resolved(), ColorScheme::Light);
        assert_eq!(serde_json::to_string(&ThemePreference::Auto).unwrap(), "\"auto\"");
    }

    #[test]
    fn test_route_gate() {
        let mut state = AppState::default();
        assert_eq!(state.route(), Route::Splash);

        state.bootstrap.initialized = true;
        assert_eq!(state.route(), Route::Auth);

        state.auth.session.data = Some(Session::restore(profile(), AuthToken::new("t".into())));
        assert_eq!(state.route(), Route::Main);
    }
}
