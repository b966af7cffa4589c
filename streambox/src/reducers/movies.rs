//! Movies slice reducer: curated lists, search and the viewed detail.

use crate::actions::MoviesAction;
use crate::constants::MIN_SEARCH_LEN;
use crate::environment::{AppEnvironment, bounded};
use crate::error::CatalogError;
use crate::movie::MoviePage;
use crate::state::MoviesState;
use streambox_core::effect::Effect;
use streambox_core::reducer::Reducer;
use streambox_core::{ResourceState, SmallVec, smallvec};

/// Movies slice reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoviesReducer;

impl MoviesReducer {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn timed_out() -> CatalogError {
    CatalogError::Network("request timed out".to_string())
}

/// Commit `result` if `seq` is still current; report whether it was.
fn commit<T, E: std::fmt::Display>(
    resource: &mut ResourceState<T>,
    seq: streambox_core::RequestSeq,
    result: Result<T, E>,
) -> bool {
    match result {
        Ok(data) => resource.resolve(seq, data),
        Err(error) => resource.reject(seq, error.to_string()),
    }
}

impl Reducer for MoviesReducer {
    type State = MoviesState;
    type Action = MoviesAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Lists
            // ═══════════════════════════════════════════════════════════════
            MoviesAction::Fetch { list, page } => {
                let Some(seq) = state.list_mut(list).begin(format!("{list}:{page}")) else {
                    tracing::debug!(%list, page, "List fetch already in flight");
                    return smallvec![Effect::None];
                };

                let catalog = env.catalog.clone();
                let timeout = env.request_timeout;
                smallvec![Effect::Future(Box::pin(async move {
                    let result = bounded(timeout, catalog.list(list, page), timed_out()).await;
                    Some(MoviesAction::ListLoaded { list, seq, result })
                }))]
            },

            MoviesAction::ListLoaded { list, seq, result } => {
                if !commit(state.list_mut(list), seq, result) {
                    tracing::debug!(%list, %seq, "Discarding stale list response");
                }
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Search
            // ═══════════════════════════════════════════════════════════════
            MoviesAction::Search { query } => {
                let query = query.trim().to_string();

                if query.chars().count() < MIN_SEARCH_LEN {
                    state.search.cancel();
                    state.search.data = MoviePage::default();
                    state.search_query = query;
                    return smallvec![Effect::None];
                }

                state.search_query.clone_from(&query);
                let Some(seq) = state.search.begin(format!("search:{query}")) else {
                    return smallvec![Effect::None];
                };

                let catalog = env.catalog.clone();
                let timeout = env.request_timeout;
                smallvec![Effect::Future(Box::pin(async move {
                    let result = bounded(timeout, catalog.search(&query, 1), timed_out()).await;
                    Some(MoviesAction::SearchLoaded { seq, result })
                }))]
            },

            MoviesAction::SearchLoaded { seq, result } => {
                if !commit(&mut state.search, seq, result) {
                    tracing::debug!(%seq, "Discarding stale search response");
                }
                smallvec![Effect::None]
            },

            MoviesAction::ClearSearch => {
                state.search.cancel();
                state.search.data = MoviePage::default();
                state.search_query.clear();
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Detail (single viewed slot)
            // ═══════════════════════════════════════════════════════════════
            MoviesAction::LoadDetail(id) => {
                if state.detail.data.as_ref().is_some_and(|d| d.id() != id) {
                    state.detail.data = None;
                }

                let Some(seq) = state.detail.begin(format!("detail:{id}")) else {
                    return smallvec![Effect::None];
                };

                let catalog = env.catalog.clone();
                let timeout = env.request_timeout;
                smallvec![Effect::Future(Box::pin(async move {
                    let result = bounded(timeout, catalog.detail(id), timed_out()).await;
                    Some(MoviesAction::DetailLoaded { seq, result })
                }))]
            },

            MoviesAction::DetailLoaded { seq, result } => {
                if !commit(&mut state.detail, seq, result.map(Some)) {
                    tracing::debug!(%seq, "Discarding stale detail response");
                }
                smallvec![Effect::None]
            },

            MoviesAction::ClearDetail => {
                state.detail.cancel();
                state.detail.data = None;
                smallvec![Effect::None]
            },

            MoviesAction::ClearError => {
                for resource in [
                    &mut state.trending,
                    &mut state.popular,
                    &mut state.upcoming,
                    &mut state.top_rated,
                    &mut state.search,
                ] {
                    resource.clear_error();
                }
                state.detail.clear_error();
                smallvec![Effect::None]
            },
        }
    }
}
