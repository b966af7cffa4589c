//! Startup: rehydrate every slice from the persistent store exactly once.
//!
//! `Start` reads the four keys concurrently; unreadable or invalid values
//! arrive as `None` and fall back to defaults. `Rehydrated` applies them and
//! emits `Initialized`, after which the route leaves the splash screen. A
//! non-empty favorites set also schedules a `RefreshAll`.

use crate::actions::{AppAction, BootstrapAction, FavoritesAction};
use crate::environment::AppEnvironment;
use crate::movie::MovieId;
use crate::state::{AppState, Session};
use streambox_core::effect::Effect;
use streambox_core::reducer::Reducer;
use streambox_core::{SmallVec, follow_up, smallvec};

/// Startup reducer over the whole application state.
#[derive(Debug, Clone, Copy, Default)]
pub struct BootstrapReducer;

impl BootstrapReducer {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Drop duplicates, keeping the first occurrence.
fn dedup_ordered(ids: impl IntoIterator<Item = MovieId>) -> Vec<MovieId> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

impl Reducer for BootstrapReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let AppAction::Bootstrap(action) = action else {
            return SmallVec::new();
        };

        match action {
            BootstrapAction::Start => {
                if state.bootstrap.started {
                    tracing::debug!("Bootstrap already started");
                    return smallvec![Effect::None];
                }
                state.bootstrap.started = true;
                state.theme.system = env.system_appearance;
                tracing::info!(namespace = env.storage.namespace(), "Rehydrating client state");

                let keys = env.persisted.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    let (theme, token, profile, favorites) = tokio::join!(
                        keys.theme.load(),
                        keys.token.load(),
                        keys.profile.load(),
                        keys.favorites.load(),
                    );
                    Some(AppAction::Bootstrap(BootstrapAction::Rehydrated {
                        theme,
                        token,
                        profile,
                        favorites,
                    }))
                }))]
            },

            BootstrapAction::Rehydrated {
                theme,
                token,
                profile,
                favorites,
            } => {
                if state.bootstrap.initialized {
                    return smallvec![Effect::None];
                }

                // A preference chosen while rehydrating is already written through.
                if state.theme.revision == 0 {
                    state.theme.preference = theme.unwrap_or_default();
                } else {
                    tracing::debug!(stored = ?theme, "Keeping theme chosen during startup");
                }

                let auth_touched = state.auth.revision > 0 || state.auth.session.is_loading();
                match (token, profile) {
                    (Some(_), Some(_)) if auth_touched => {
                        tracing::debug!("Keeping session activity started during startup");
                    },
                    (Some(token), Some(user)) => {
                        let session = Session::restore(user, token);
                        tracing::info!(user_id = session.user_id(), kind = ?session.kind, "Restored session");
                        state.auth.session.data = Some(session);
                    },
                    (None, None) => {},
                    (token, profile) => {
                        tracing::warn!(
                            has_token = token.is_some(),
                            has_profile = profile.is_some(),
                            "Incomplete persisted session, starting signed out"
                        );
                    },
                }

                // Anything favorited while rehydrating stays, after the stored ids.
                let stored = favorites.unwrap_or_default();
                let pending = std::mem::take(&mut state.favorites.ids);
                let merged_pending = !pending.is_empty();
                state.favorites.ids = dedup_ordered(stored.into_iter().chain(pending));

                state.bootstrap.initialized = true;
                tracing::info!(
                    route = ?state.route(),
                    favorites = state.favorites.ids.len(),
                    theme = ?state.theme.resolved(),
                    "Client state rehydrated"
                );

                let mut effects: SmallVec<[Effect<AppAction>; 4]> =
                    smallvec![follow_up!(AppAction::Bootstrap(BootstrapAction::Initialized))];
                if merged_pending {
                    state.favorites.revision += 1;
                    let revision = state.favorites.revision;
                    let ids = state.favorites.ids.clone();
                    let key = env.persisted.favorites.clone();
                    effects.push(Effect::Future(Box::pin(async move {
                        if let Err(error) = key.save(revision, &ids).await {
                            tracing::warn!(%error, "Favorites write failed after rehydration");
                        }
                        None
                    })));
                }
                if !state.favorites.ids.is_empty() {
                    effects.push(follow_up!(AppAction::Favorites(FavoritesAction::RefreshAll)));
                }
                effects
            },

            BootstrapAction::Initialized => {
                tracing::debug!("Bootstrap complete");
                smallvec![Effect::None]
            },
        }
    }
}
