//! Reducers of the client.
//!
//! Each slice owns its state and the persisted keys that belong to it.
//! [`AppReducer`] scopes the slices into [`AppState`] / [`AppAction`] and
//! runs the startup reducer alongside them.

pub mod auth;
pub mod bootstrap;
pub mod favorites;
pub mod movies;
pub mod theme;

pub use auth::AuthReducer;
pub use bootstrap::BootstrapReducer;
pub use favorites::FavoritesReducer;
pub use movies::MoviesReducer;
pub use theme::ThemeReducer;

use crate::actions::AppAction;
use crate::environment::AppEnvironment;
use crate::state::{AppState, AuthState, FavoritesState, MoviesState, ThemeState};
use std::sync::Arc;
use streambox_core::composition::{BoxedReducer, CombinedReducer, combine_reducers, scope_reducer};
use streambox_core::effect::Effect;
use streambox_core::reducer::Reducer;
use streambox_core::SmallVec;

fn auth_state(state: &mut AppState) -> &mut AuthState {
    &mut state.auth
}

fn movies_state(state: &mut AppState) -> &mut MoviesState {
    &mut state.movies
}

fn favorites_state(state: &mut AppState) -> &mut FavoritesState {
    &mut state.favorites
}

fn theme_state(state: &mut AppState) -> &mut ThemeState {
    &mut state.theme
}

/// Root reducer: every slice plus startup.
#[derive(Clone)]
pub struct AppReducer {
    inner: Arc<CombinedReducer<AppState, AppAction, AppEnvironment>>,
}

impl AppReducer {
    /// Compose the slice reducers.
    #[must_use]
    pub fn new() -> Self {
        let slices: Vec<BoxedReducer<AppState, AppAction, AppEnvironment>> = vec![
            Box::new(scope_reducer(
                AuthReducer,
                auth_state,
                AppAction::into_auth,
                AppAction::Auth,
            )),
            Box::new(scope_reducer(
                MoviesReducer,
                movies_state,
                AppAction::into_movies,
                AppAction::Movies,
            )),
            Box::new(scope_reducer(
                FavoritesReducer,
                favorites_state,
                AppAction::into_favorites,
                AppAction::Favorites,
            )),
            Box::new(scope_reducer(
                ThemeReducer,
                theme_state,
                AppAction::into_theme,
                AppAction::Theme,
            )),
            Box::new(BootstrapReducer),
        ];

        Self {
            inner: Arc::new(combine_reducers(slices)),
        }
    }
}

impl Default for AppReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AppReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AppReducer")
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        self.inner.reduce(state, action, env)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::actions::{FavoritesAction, ThemeAction};
    use crate::mocks::{InMemoryKvStore, MockCatalog, MockIdentity};
    use crate::movie::MovieId;
    use crate::state::ThemePreference;

    fn env() -> AppEnvironment {
        AppEnvironment::new(
            Arc::new(MockIdentity::new()),
            Arc::new(MockCatalog::new()),
            Arc::new(InMemoryKvStore::new()),
        )
    }

    #[test]
    fn test_actions_reach_only_their_slice() {
        let env = env();
        let mut state = AppState::default();

        AppReducer::new().reduce(&mut state, ThemeAction::Set(ThemePreference::Dark).into(), &env);
        AppReducer::new().reduce(&mut state, FavoritesAction::Add(MovieId(4)).into(), &env);

        assert_eq!(state.theme.preference, ThemePreference::Dark);
        assert_eq!(state.favorites.ids, vec![MovieId(4)]);
        assert_eq!(state.movies, crate::state::MoviesState::default());
        assert!(!state.bootstrap.started);
    }
}
