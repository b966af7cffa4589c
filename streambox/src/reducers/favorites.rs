//! Favorites slice reducer.
//!
//! The id list is the source of truth and is mutated synchronously, so a
//! second toggle dispatched before the first write lands already sees the
//! new membership. Movie details are a cache rebuilt by `RefreshAll` and
//! topped up by the prefetch that follows each `Add`.

use crate::actions::FavoritesAction;
use crate::environment::{AppEnvironment, bounded};
use crate::error::CatalogError;
use crate::movie::{MovieDetail, MovieId};
use crate::state::FavoritesState;
use futures::StreamExt;
use std::collections::HashMap;
use streambox_core::effect::Effect;
use streambox_core::reducer::Reducer;
use streambox_core::{RequestSeq, SmallVec, smallvec};

/// Favorites slice reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FavoritesReducer;

impl FavoritesReducer {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn persist(state: &mut FavoritesState, env: &AppEnvironment) -> Effect<FavoritesAction> {
        state.revision += 1;
        let revision = state.revision;
        let ids = state.ids.clone();
        let key = env.persisted.favorites.clone();

        Effect::Future(Box::pin(async move {
            if let Err(error) = key.save(revision, &ids).await {
                tracing::warn!(%error, revision, "Favorites write failed, keeping in-memory set");
            }
            None
        }))
    }

    fn apply_refresh(
        state: &mut FavoritesState,
        seq: RequestSeq,
        results: Vec<(MovieId, Result<MovieDetail, CatalogError>)>,
    ) {
        if !state.movies.is_current(seq) {
            tracing::debug!(%seq, "Discarding stale favorites refresh");
            return;
        }

        let attempted = results.len();
        let mut fetched: HashMap<MovieId, Result<MovieDetail, CatalogError>> = results.into_iter().collect();
        let mut previous: HashMap<MovieId, MovieDetail> =
            state.movies.data.drain(..).map(|m| (m.id(), m)).collect();

        let mut merged = Vec::with_capacity(state.ids.len());
        let mut unresolved = Vec::new();
        let mut failures = 0;
        let mut first_error = None;

        for id in &state.ids {
            match fetched.remove(id) {
                Some(Ok(detail)) => merged.push(detail),
                Some(Err(error)) => {
                    failures += 1;
                    tracing::warn!(movie_id = %id, %error, "Favorite detail fetch failed");
                    first_error.get_or_insert_with(|| error.to_string());
                    unresolved.push(*id);
                    merged.extend(previous.remove(id));
                },
                // Added after the refresh started; keep whatever the prefetch brought.
                None => merged.extend(previous.remove(id)),
            }
        }

        state.unresolved = unresolved;

        if attempted > 0 && failures == attempted {
            state.movies.reject(seq, first_error.unwrap_or_default());
            state.movies.data = merged;
        } else {
            state.movies.resolve(seq, merged);
        }

        tracing::debug!(
            favorites = state.ids.len(),
            resolved = state.movies.data.len(),
            failed = failures,
            "Favorites refreshed"
        );
    }
}

/// Insert `detail` keeping `movies` in `ids` order.
fn insert_ordered(movies: &mut Vec<MovieDetail>, ids: &[MovieId], detail: MovieDetail) {
    let id = detail.id();
    movies.retain(|m| m.id() != id);
    movies.push(detail);
    movies.sort_by_key(|m| ids.iter().position(|x| *x == m.id()));
}

impl Reducer for FavoritesReducer {
    type State = FavoritesState;
    type Action = FavoritesAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Membership
            // ═══════════════════════════════════════════════════════════════
            FavoritesAction::Add(id) => {
                if state.is_favorite(id) {
                    return smallvec![Effect::None];
                }
                state.ids.push(id);
                tracing::debug!(movie_id = %id, "Added favorite");

                let catalog = env.catalog.clone();
                let timeout = env.request_timeout;
                let prefetch = Effect::Future(Box::pin(async move {
                    let result = bounded(
                        timeout,
                        catalog.detail(id),
                        CatalogError::Network("request timed out".to_string()),
                    )
                    .await;
                    Some(FavoritesAction::DetailPrefetched { id, result })
                }));

                smallvec![Self::persist(state, env), prefetch]
            },

            FavoritesAction::Remove(id) => {
                if !state.is_favorite(id) {
                    return smallvec![Effect::None];
                }
                state.ids.retain(|x| *x != id);
                state.movies.data.retain(|m| m.id() != id);
                state.unresolved.retain(|x| *x != id);
                tracing::debug!(movie_id = %id, "Removed favorite");

                smallvec![Self::persist(state, env)]
            },

            FavoritesAction::Toggle(id) => {
                let intent = if state.is_favorite(id) {
                    FavoritesAction::Remove(id)
                } else {
                    FavoritesAction::Add(id)
                };
                self.reduce(state, intent, env)
            },

            FavoritesAction::DetailPrefetched { id, result } => {
                if !state.is_favorite(id) {
                    return smallvec![Effect::None];
                }
                match result {
                    Ok(detail) => {
                        state.unresolved.retain(|x| *x != id);
                        insert_ordered(&mut state.movies.data, &state.ids, detail);
                    },
                    Err(error) => {
                        tracing::warn!(movie_id = %id, %error, "Favorite prefetch failed");
                        if !state.unresolved.contains(&id) {
                            state.unresolved.push(id);
                        }
                    },
                }
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // RefreshAll: bounded fan-out, per-item failures collected
            // ═══════════════════════════════════════════════════════════════
            FavoritesAction::RefreshAll => {
                let key = state
                    .ids
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");

                let Some(seq) = state.movies.begin(key) else {
                    tracing::debug!("Favorites refresh already in flight");
                    return smallvec![Effect::None];
                };

                if state.ids.is_empty() {
                    state.unresolved.clear();
                    state.movies.resolve(seq, Vec::new());
                    return smallvec![Effect::None];
                }

                let ids = state.ids.clone();
                let catalog = env.catalog.clone();
                let timeout = env.request_timeout;
                let limit = env.favorites_concurrency.max(1);

                smallvec![Effect::Future(Box::pin(async move {
                    let results = futures::stream::iter(ids)
                        .map(|id| {
                            let catalog = catalog.clone();
                            async move {
                                let result = bounded(
                                    timeout,
                                    catalog.detail(id),
                                    CatalogError::Network("request timed out".to_string()),
                                )
                                .await;
                                (id, result)
                            }
                        })
                        .buffered(limit)
                        .collect::<Vec<_>>()
                        .await;
                    Some(FavoritesAction::Refreshed { seq, results })
                }))]
            },

            FavoritesAction::Refreshed { seq, results } => {
                Self::apply_refresh(state, seq, results);
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::catalog::sample_movie;
    use crate::mocks::{InMemoryKvStore, MockCatalog, MockIdentity};
    use std::sync::Arc;
    use streambox_core::FetchStatus;
    use streambox_testing::helpers::run_effects;
    use streambox_testing::{ReducerTest, assertions};

    fn env(catalog: MockCatalog) -> (AppEnvironment, InMemoryKvStore) {
        let kv = InMemoryKvStore::new();
        let env = AppEnvironment::new(
            Arc::new(MockIdentity::new()),
            Arc::new(catalog),
            Arc::new(kv.clone()),
        );
        (env, kv)
    }

    fn ids(raw: &[u64]) -> Vec<MovieId> {
        raw.iter().copied().map(MovieId).collect()
    }

    #[test]
    fn test_duplicate_add_is_idempotent() {
        let (env, _) = env(MockCatalog::new());
        let mut state = FavoritesState::default();

        FavoritesReducer.reduce(&mut state, FavoritesAction::Add(MovieId(5)), &env);

        ReducerTest::new(FavoritesReducer)
            .with_env(env)
            .given_state(state)
            .when_action(FavoritesAction::Add(MovieId(5)))
            .then_state(|state| assert_eq!(state.ids, vec![MovieId(5)]))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_rapid_toggles_observe_each_other() {
        let (env, _) = env(MockCatalog::new());
        let mut state = FavoritesState::default();

        FavoritesReducer.reduce(&mut state, FavoritesAction::Toggle(MovieId(1)), &env);
        assert!(state.is_favorite(MovieId(1)));

        FavoritesReducer.reduce(&mut state, FavoritesAction::Toggle(MovieId(1)), &env);
        assert!(!state.is_favorite(MovieId(1)));
        assert_eq!(state.revision(), 2);
    }

    #[tokio::test]
    async fn test_add_persists_and_prefetches() {
        let catalog = MockCatalog::new().with_movie(sample_movie(7, "Heat"));
        let (env, kv) = env(catalog);
        let mut state = FavoritesState::default();

        let effects = FavoritesReducer.reduce(&mut state, FavoritesAction::Add(MovieId(7)), &env);
        assertions::assert_effects_count(&effects, 2);

        let produced = run_effects(effects.into_vec()).await;
        assert_eq!(kv.raw("@streambox/favorites").as_deref(), Some("[7]"));

        for action in produced {
            FavoritesReducer.reduce(&mut state, action, &env);
        }
        assert_eq!(state.movies.data[0].summary.title, "Heat");
    }

    #[test]
    fn test_remove_prunes_cache() {
        let (env, _) = env(MockCatalog::new());
        let mut state = FavoritesState {
            ids: ids(&[1, 2]),
            ..FavoritesState::default()
        };
        state.movies.data = vec![sample_movie(1, "A"), sample_movie(2, "B")];
        state.unresolved = ids(&[2]);

        FavoritesReducer.reduce(&mut state, FavoritesAction::Remove(MovieId(2)), &env);

        assert_eq!(state.ids, ids(&[1]));
        assert_eq!(state.movies.data.len(), 1);
        assert!(state.unresolved.is_empty());
    }

    #[test]
    fn test_prefetch_for_removed_id_is_ignored() {
        let (env, _) = env(MockCatalog::new());
        let mut state = FavoritesState::default();

        FavoritesReducer.reduce(
            &mut state,
            FavoritesAction::DetailPrefetched {
                id: MovieId(3),
                result: Ok(sample_movie(3, "Gone")),
            },
            &env,
        );

        assert!(state.movies.data.is_empty());
    }

    #[test]
    fn test_prefetch_inserts_in_favorite_order() {
        let (env, _) = env(MockCatalog::new());
        let mut state = FavoritesState {
            ids: ids(&[1, 2, 3]),
            ..FavoritesState::default()
        };
        state.movies.data = vec![sample_movie(1, "A"), sample_movie(3, "C")];

        FavoritesReducer.reduce(
            &mut state,
            FavoritesAction::DetailPrefetched {
                id: MovieId(2),
                result: Ok(sample_movie(2, "B")),
            },
            &env,
        );

        let order: Vec<MovieId> = state.movies.data.iter().map(MovieDetail::id).collect();
        assert_eq!(order, ids(&[1, 2, 3]));
    }

    #[tokio::test]
    async fn test_refresh_with_one_failure() {
        let catalog = MockCatalog::new()
            .with_movie(sample_movie(1, "A"))
            .with_movie(sample_movie(2, "B"))
            .with_movie(sample_movie(3, "C"))
            .with_failing_detail(MovieId(2), CatalogError::Server("HTTP 500".into()));
        let (env, _) = env(catalog);
        let mut state = FavoritesState {
            ids: ids(&[1, 2, 3]),
            ..FavoritesState::default()
        };

        let effects = FavoritesReducer.reduce(&mut state, FavoritesAction::RefreshAll, &env);
        for action in run_effects(effects.into_vec()).await {
            FavoritesReducer.reduce(&mut state, action, &env);
        }

        assert_eq!(state.ids, ids(&[1, 2, 3]));
        assert_eq!(state.movies.status(), FetchStatus::Succeeded);
        let resolved: Vec<MovieId> = state.movies.data.iter().map(MovieDetail::id).collect();
        assert_eq!(resolved, ids(&[1, 3]));
        assert_eq!(state.unresolved, ids(&[2]));
    }

    #[test]
    fn test_refresh_all_failing_is_a_failure() {
        let (env, _) = env(MockCatalog::new());
        let mut state = FavoritesState {
            ids: ids(&[1]),
            ..FavoritesState::default()
        };
        let seq = state.movies.begin("1").unwrap();

        FavoritesReducer.reduce(
            &mut state,
            FavoritesAction::Refreshed {
                seq,
                results: vec![(MovieId(1), Err(CatalogError::Network("offline".into())))],
            },
            &env,
        );

        assert_eq!(state.movies.status(), FetchStatus::Failed);
        assert_eq!(state.movies.error(), Some("Network error: offline"));
        assert_eq!(state.ids, ids(&[1]));
    }

    #[test]
    fn test_refresh_drops_ids_removed_meanwhile() {
        let (env, _) = env(MockCatalog::new());
        let mut state = FavoritesState {
            ids: ids(&[1, 2]),
            ..FavoritesState::default()
        };
        let seq = state.movies.begin("1,2").unwrap();
        state.ids = ids(&[1]);

        FavoritesReducer.reduce(
            &mut state,
            FavoritesAction::Refreshed {
                seq,
                results: vec![(MovieId(1), Ok(sample_movie(1, "A"))), (MovieId(2), Ok(sample_movie(2, "B")))],
            },
            &env,
        );

        assert_eq!(state.movies.data.len(), 1);
    }

    #[test]
    fn test_refresh_of_empty_set_resolves_immediately() {
        let (env, _) = env(MockCatalog::new());

        ReducerTest::new(FavoritesReducer)
            .with_env(env)
            .given_state(FavoritesState::default())
            .when_action(FavoritesAction::RefreshAll)
            .then_state(|state| assert_eq!(state.movies.status(), FetchStatus::Succeeded))
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
