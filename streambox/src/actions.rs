//! Actions of the client.
//!
//! Intents come from the UI; the `*Completed` / `*Loaded` variants are
//! produced by effects and carry the [`RequestSeq`] of the request they
//! answer.

use crate::error::{AuthError, CatalogError};
use crate::movie::{MovieDetail, MovieId, MoviePage};
use crate::providers::ListKind;
use crate::state::{AuthToken, ColorScheme, Session, ThemePreference, UserProfile};
use crate::validation::RegisterForm;
use streambox_core::RequestSeq;

/// Auth slice actions.
///
/// `Debug` output never contains passwords.
#[derive(Clone, PartialEq)]
pub enum AuthAction {
    // Intents
    /// Sign in with username and password
    Login {
        /// Username
        username: String,
        /// Password
        password: String,
    },
    /// Create an account and sign in
    Register(RegisterForm),
    /// Sign out and forget the persisted session
    Logout,
    /// Dismiss the last error and field messages
    ClearError,

    // Results
    /// Answer to `Login`
    LoginCompleted {
        /// Request this answers
        seq: RequestSeq,
        /// Session or failure
        result: Result<Session, AuthError>,
    },
    /// Answer to `Register`
    RegisterCompleted {
        /// Request this answers
        seq: RequestSeq,
        /// Session or failure
        result: Result<Session, AuthError>,
    },
    /// The persisted session keys were removed after `Logout`
    SessionCleared,
}

impl std::fmt::Debug for AuthAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::Register(form) => f.debug_tuple("Register").field(form).finish(),
            Self::Logout => f.write_str("Logout"),
            Self::ClearError => f.write_str("ClearError"),
            Self::LoginCompleted { seq, result } => f
                .debug_struct("LoginCompleted")
                .field("seq", seq)
                .field("result", result)
                .finish(),
            Self::RegisterCompleted { seq, result } => f
                .debug_struct("RegisterCompleted")
                .field("seq", seq)
                .field("result", result)
                .finish(),
            Self::SessionCleared => f.write_str("SessionCleared"),
        }
    }
}

/// Movies slice actions.
#[derive(Debug, Clone, PartialEq)]
pub enum MoviesAction {
    // Intents
    /// Load one page of a list
    Fetch {
        /// List to load
        list: ListKind,
        /// Page (1-based)
        page: u32,
    },
    /// Search by title
    Search {
        /// Raw query; trimmed before use
        query: String,
    },
    /// Drop search results and any in-flight search
    ClearSearch,
    /// Load the detail of a movie into the viewed slot
    LoadDetail(MovieId),
    /// Empty the viewed slot
    ClearDetail,
    /// Dismiss errors on every movies resource
    ClearError,

    // Results
    /// Answer to `Fetch`
    ListLoaded {
        /// List this answers
        list: ListKind,
        /// Request this answers
        seq: RequestSeq,
        /// Page or failure
        result: Result<MoviePage, CatalogError>,
    },
    /// Answer to `Search`
    SearchLoaded {
        /// Request this answers
        seq: RequestSeq,
        /// Page or failure
        result: Result<MoviePage, CatalogError>,
    },
    /// Answer to `LoadDetail`
    DetailLoaded {
        /// Request this answers
        seq: RequestSeq,
        /// Detail or failure
        result: Result<MovieDetail, CatalogError>,
    },
}

/// Favorites slice actions.
#[derive(Debug, Clone, PartialEq)]
pub enum FavoritesAction {
    // Intents
    /// Favorite a movie (no-op if already favorited)
    Add(MovieId),
    /// Unfavorite a movie
    Remove(MovieId),
    /// Add or remove depending on current membership
    Toggle(MovieId),
    /// Refetch the detail of every favorite
    RefreshAll,

    // Results
    /// Detail fetched after `Add`
    DetailPrefetched {
        /// Favorited movie
        id: MovieId,
        /// Detail or failure
        result: Result<MovieDetail, CatalogError>,
    },
    /// Answer to `RefreshAll`, in the order the ids were requested
    Refreshed {
        /// Request this answers
        seq: RequestSeq,
        /// Per-id outcome
        results: Vec<(MovieId, Result<MovieDetail, CatalogError>)>,
    },
}

/// Theme slice actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    /// Store a preference
    Set(ThemePreference),
    /// Flip the resolved scheme
    Toggle,
    /// The host switched between light and dark
    SystemAppearanceChanged(ColorScheme),
}

/// Startup actions.
#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapAction {
    /// Rehydrate from the persistent store (runs once)
    Start,
    /// Values read from the persistent store; `None` for absent or unreadable keys
    Rehydrated {
        /// Stored theme preference
        theme: Option<ThemePreference>,
        /// Stored auth token
        token: Option<AuthToken>,
        /// Stored user profile
        profile: Option<UserProfile>,
        /// Stored favorite ids
        favorites: Option<Vec<MovieId>>,
    },
    /// Rehydrated state has been applied; the UI may navigate
    Initialized,
}

/// Every action the Store accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Auth slice
    Auth(AuthAction),
    /// Movies slice
    Movies(MoviesAction),
    /// Favorites slice
    Favorites(FavoritesAction),
    /// Theme slice
    Theme(ThemeAction),
    /// Startup
    Bootstrap(BootstrapAction),
}

impl AppAction {
    pub(crate) fn into_auth(self) -> Option<AuthAction> {
        match self {
            Self::Auth(action) => Some(action),
            _ => None,
        }
    }

    pub(crate) fn into_movies(self) -> Option<MoviesAction> {
        match self {
            Self::Movies(action) => Some(action),
            _ => None,
        }
    }

    pub(crate) fn into_favorites(self) -> Option<FavoritesAction> {
        match self {
            Self::Favorites(action) => Some(action),
            _ => None,
        }
    }

    pub(crate) fn into_theme(self) -> Option<ThemeAction> {
        match self {
            Self::Theme(action) => Some(action),
            _ => None,
        }
    }

    /// Whether this is the end of startup.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        matches!(self, Self::Bootstrap(BootstrapAction::Initialized))
    }
}

impl From<AuthAction> for AppAction {
    fn from(action: AuthAction) -> Self {
        Self::Auth(action)
    }
}

impl From<MoviesAction> for AppAction {
    fn from(action: MoviesAction) -> Self {
        Self::Movies(action)
    }
}

impl From<FavoritesAction> for AppAction {
    fn from(action: FavoritesAction) -> Self {
        Self::Favorites(action)
    }
}

impl From<ThemeAction> for AppAction {
    fn from(action: ThemeAction) -> Self {
        Self::Theme(action)
    }
}

impl From<BootstrapAction> for AppAction {
    fn from(action: BootstrapAction) -> Self {
        Self::Bootstrap(action)
    }
}
