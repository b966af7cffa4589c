//! Scripted movie catalog.

use super::lock;
use crate::error::CatalogError;
use crate::movie::{MovieDetail, MovieId, MoviePage, MovieSummary};
use crate::providers::{CatalogClient, ListKind};
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Build a minimal movie for tests and demos.
#[must_use]
pub fn sample_movie(id: u64, title: &str) -> MovieDetail {
    MovieDetail {
        summary: MovieSummary {
            id: MovieId(id),
            title: title.to_string(),
            overview: format!("{title} overview"),
            poster_path: Some(format!("/poster-{id}.jpg")),
            backdrop_path: None,
            release_date: "2024-05-01".to_string(),
            vote_average: 7.5,
            vote_count: 100,
            popularity: 10.0,
            original_language: "en".to_string(),
            adult: false,
            genre_ids: Vec::new(),
        },
        runtime: Some(118),
        genres: Vec::new(),
        status: "Released".to_string(),
        tagline: None,
        budget: 0,
        revenue: 0,
    }
}

/// Calls received by a [`MockCatalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogCalls {
    /// `list` calls
    pub list: usize,
    /// `search` calls
    pub search: usize,
    /// `detail` calls
    pub detail: usize,
}

#[derive(Debug, Default)]
struct Script {
    movies: Vec<MovieDetail>,
    lists: HashMap<ListKind, MoviePage>,
    list_delays: HashMap<ListKind, Duration>,
    search_delays: HashMap<String, Duration>,
    detail_delays: HashMap<MovieId, Duration>,
    failing_details: HashMap<MovieId, CatalogError>,
    list_failure: Option<CatalogError>,
    calls: CatalogCalls,
}

/// In-memory catalog with scripted latency and failures.
///
/// Search matches titles case-insensitively; lists default to every known
/// movie unless a page was scripted with [`MockCatalog::with_list`].
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    script: Arc<Mutex<Script>>,
}

impl MockCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a movie.
    #[must_use]
    pub fn with_movie(self, movie: MovieDetail) -> Self {
        lock(&self.script).movies.push(movie);
        self
    }

    /// Answer `list` with `page`.
    #[must_use]
    pub fn with_list(self, list: ListKind, page: MoviePage) -> Self {
        lock(&self.script).lists.insert(list, page);
        self
    }

    /// Delay answers for `list`.
    #[must_use]
    pub fn with_list_delay(self, list: ListKind, delay: Duration) -> Self {
        lock(&self.script).list_delays.insert(list, delay);
        self
    }

    /// Delay answers for the exact search `query`.
    #[must_use]
    pub fn with_search_delay(self, query: &str, delay: Duration) -> Self {
        lock(&self.script).search_delays.insert(query.to_string(), delay);
        self
    }

    /// Delay the detail of `id`.
    #[must_use]
    pub fn with_detail_delay(self, id: MovieId, delay: Duration) -> Self {
        lock(&self.script).detail_delays.insert(id, delay);
        self
    }

    /// Fail the detail of `id` with `error`.
    #[must_use]
    pub fn with_failing_detail(self, id: MovieId, error: CatalogError) -> Self {
        lock(&self.script).failing_details.insert(id, error);
        self
    }

    /// Fail every `list` and `search` call with `error`.
    #[must_use]
    pub fn with_list_failure(self, error: CatalogError) -> Self {
        lock(&self.script).list_failure = Some(error);
        self
    }

    /// Stop failing the detail of `id`.
    pub fn heal_detail(&self, id: MovieId) {
        lock(&self.script).failing_details.remove(&id);
    }

    /// Calls received so far.
    #[must_use]
    pub fn calls(&self) -> CatalogCalls {
        lock(&self.script).calls
    }

    fn page_of(movies: impl Iterator<Item = MovieSummary>, page: u32) -> MoviePage {
        let results: Vec<MovieSummary> = movies.collect();
        let total = u32::try_from(results.len()).unwrap_or(u32::MAX);
        MoviePage {
            page,
            results,
            total_pages: 1,
            total_results: total,
        }
    }

    async fn after(delay: Option<Duration>) {
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl CatalogClient for MockCatalog {
    fn list(&self, list: ListKind, page: u32) -> BoxFuture<'_, Result<MoviePage, CatalogError>> {
        let (delay, result) = {
            let mut script = lock(&self.script);
            script.calls.list += 1;

            let result = match &script.list_failure {
                Some(error) => Err(error.clone()),
                None => Ok(script.lists.get(&list).cloned().unwrap_or_else(|| {
                    Self::page_of(script.movies.iter().map(|m| m.summary.clone()), page)
                })),
            };
            (script.list_delays.get(&list).copied(), result)
        };

        async move {
            Self::after(delay).await;
            result
        }
        .boxed()
    }

    fn search<'a>(&'a self, query: &'a str, page: u32) -> BoxFuture<'a, Result<MoviePage, CatalogError>> {
        let (delay, result) = {
            let mut script = lock(&self.script);
            script.calls.search += 1;

            let needle = query.to_lowercase();
            let result = match &script.list_failure {
                Some(error) => Err(error.clone()),
                None => Ok(Self::page_of(
                    script
                        .movies
                        .iter()
                        .filter(|m| m.summary.title.to_lowercase().contains(&needle))
                        .map(|m| m.summary.clone()),
                    page,
                )),
            };
            (script.search_delays.get(query).copied(), result)
        };

        async move {
            Self::after(delay).await;
            result
        }
        .boxed()
    }

    fn detail(&self, id: MovieId) -> BoxFuture<'_, Result<MovieDetail, CatalogError>> {
        let (delay, result) = {
            let mut script = lock(&self.script);
            script.calls.detail += 1;

            let result = match script.failing_details.get(&id) {
                Some(error) => Err(error.clone()),
                None => script
                    .movies
                    .iter()
                    .find(|m| m.id() == id)
                    .cloned()
                    .ok_or(CatalogError::NotFound),
            };
            (script.detail_delays.get(&id).copied(), result)
        };

        async move {
            Self::after(delay).await;
            result
        }
        .boxed()
    }
}
