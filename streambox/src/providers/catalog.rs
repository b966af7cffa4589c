//! Movie catalog trait.

use crate::error::CatalogError;
use crate::movie::{MovieDetail, MovieId, MoviePage};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// Window of the trending list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    /// Trending today
    Day,
    /// Trending this week
    #[default]
    Week,
}

impl TimeWindow {
    /// Path segment used by the catalog.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

/// A curated movie list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    /// Trending movies over a window
    Trending(TimeWindow),
    /// Popular movies
    Popular,
    /// Upcoming releases
    Upcoming,
    /// Highest rated movies
    TopRated,
}

impl ListKind {
    /// Catalog path of the list, relative to the API base.
    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::Trending(window) => format!("/trending/movie/{}", window.as_str()),
            Self::Popular => "/movie/popular".to_string(),
            Self::Upcoming => "/movie/upcoming".to_string(),
            Self::TopRated => "/movie/top_rated".to_string(),
        }
    }
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trending(window) => write!(f, "trending_{}", window.as_str()),
            Self::Popular => f.write_str("popular"),
            Self::Upcoming => f.write_str("upcoming"),
            Self::TopRated => f.write_str("top_rated"),
        }
    }
}

/// Read-only access to the movie catalog. Every call is idempotent.
pub trait CatalogClient: Send + Sync {
    /// One page of a curated list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Network`] or [`CatalogError::Server`].
    fn list(&self, list: ListKind, page: u32) -> BoxFuture<'_, Result<MoviePage, CatalogError>>;

    /// One page of search results for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Network`] or [`CatalogError::Server`].
    fn search<'a>(&'a self, query: &'a str, page: u32) -> BoxFuture<'a, Result<MoviePage, CatalogError>>;

    /// Full detail of one movie.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for unknown ids, otherwise
    /// [`CatalogError::Network`] or [`CatalogError::Server`].
    fn detail(&self, id: MovieId) -> BoxFuture<'_, Result<MovieDetail, CatalogError>>;
}
