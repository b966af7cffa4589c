//! Catalog models.
//!
//! Field names follow the catalog's JSON (snake_case), so the types
//! deserialize straight from HTTP responses. Movies are immutable values:
//! every fetch replaces them wholesale.

use crate::constants::{PLACEHOLDER_BACKDROP_URL, PLACEHOLDER_POSTER_URL};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Server-assigned movie identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl MovieId {
    /// Create a new movie id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Genre of a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    /// Genre id
    pub id: u32,
    /// Display name
    pub name: String,
}

/// A movie as returned by list and search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// Movie id
    pub id: MovieId,
    /// Title
    pub title: String,
    /// Plot overview
    #[serde(default)]
    pub overview: String,
    /// Poster path relative to the image base
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop path relative to the image base
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Release date (`YYYY-MM-DD`, may be empty)
    #[serde(default)]
    pub release_date: String,
    /// Average vote out of 10
    #[serde(default)]
    pub vote_average: f64,
    /// Number of votes
    #[serde(default)]
    pub vote_count: u64,
    /// Popularity score
    #[serde(default)]
    pub popularity: f64,
    /// ISO 639-1 language code
    #[serde(default)]
    pub original_language: String,
    /// Adult flag
    #[serde(default)]
    pub adult: bool,
    /// Genre ids (list endpoints only)
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

/// A movie with the extra fields of the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    /// Fields shared with list results
    #[serde(flatten)]
    pub summary: MovieSummary,
    /// Runtime in minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Genres
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Release status (e.g. "Released")
    #[serde(default)]
    pub status: String,
    /// Tagline
    #[serde(default)]
    pub tagline: Option<String>,
    /// Budget in USD
    #[serde(default)]
    pub budget: u64,
    /// Revenue in USD
    #[serde(default)]
    pub revenue: u64,
}

impl MovieDetail {
    /// Movie id.
    #[must_use]
    pub const fn id(&self) -> MovieId {
        self.summary.id
    }

    /// Runtime as `"2h 5m"`, `"45m"` or `"2h"`.
    #[must_use]
    pub fn formatted_runtime(&self) -> Option<String> {
        self.runtime.filter(|m| *m > 0).map(format_runtime)
    }
}

/// One page of list or search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    /// Page number (1-based)
    #[serde(default)]
    pub page: u32,
    /// Movies on this page
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    /// Total pages available
    #[serde(default)]
    pub total_pages: u32,
    /// Total results available
    #[serde(default)]
    pub total_results: u32,
}

/// Rendition size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSize {
    /// 185px wide
    W185,
    /// 342px wide
    W342,
    /// 500px wide
    W500,
    /// 780px wide
    W780,
    /// Source resolution
    Original,
}

impl ImageSize {
    /// Path token used by the image CDN.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::W185 => "w185",
            Self::W342 => "w342",
            Self::W500 => "w500",
            Self::W780 => "w780",
            Self::Original => "original",
        }
    }
}

/// What an image is used for; decides which placeholder replaces a missing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Portrait poster
    Poster,
    /// Landscape backdrop
    Backdrop,
}

/// Resolve an image path to a full URL.
///
/// A missing or empty path resolves to a placeholder image rather than a
/// broken reference.
#[must_use]
pub fn image_url(base: &str, path: Option<&str>, size: ImageSize, kind: ImageKind) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(path) => format!("{}/{}{}", base.trim_end_matches('/'), size.token(), path),
        None => match kind {
            ImageKind::Poster => PLACEHOLDER_POSTER_URL.to_string(),
            ImageKind::Backdrop => PLACEHOLDER_BACKDROP_URL.to_string(),
        },
    }
}

impl MovieSummary {
    /// Poster URL at `size`, or the poster placeholder.
    #[must_use]
    pub fn poster_url(&self, image_base: &str, size: ImageSize) -> String {
        image_url(image_base, self.poster_path.as_deref(), size, ImageKind::Poster)
    }

    /// Backdrop URL at `size`, or the backdrop placeholder.
    #[must_use]
    pub fn backdrop_url(&self, image_base: &str, size: ImageSize) -> String {
        image_url(image_base, self.backdrop_path.as_deref(), size, ImageKind::Backdrop)
    }

    /// Vote average with one decimal, e.g. `"7.3"`.
    #[must_use]
    pub fn formatted_rating(&self) -> String {
        format!("{:.1}", self.vote_average)
    }

    /// Release year, if the release date parses.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.parsed_release_date().map(|d| d.year())
    }

    /// Release date as `"January 5, 2024"`, or `"N/A"`.
    #[must_use]
    pub fn formatted_release_date(&self) -> String {
        self.parsed_release_date()
            .map_or_else(|| "N/A".to_string(), |d| d.format("%B %-d, %Y").to_string())
    }

    fn parsed_release_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d").ok()
    }
}

/// Minutes as `"2h 5m"`, dropping a zero component.
#[must_use]
pub fn format_runtime(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;

    match (hours, mins) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Truncate to `max_chars` characters, appending `...` when cut.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DETAIL_JSON: &str = r#"{
        "id": 550,
        "title": "Fight Club",
        "overview": "An insomniac office worker...",
        "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
        "backdrop_path": null,
        "release_date": "1999-10-15",
        "vote_average": 8.433,
        "vote_count": 26280,
        "popularity": 61.4,
        "original_language": "en",
        "adult": false,
        "runtime": 139,
        "genres": [{"id": 18, "name": "Drama"}],
        "status": "Released",
        "tagline": "Mischief. Mayhem. Soap.",
        "budget": 63000000,
        "revenue": 100853753
    }"#;

    #[test]
    fn test_detail_deserializes_from_catalog_json() {
        let detail: MovieDetail = serde_json::from_str(DETAIL_JSON).unwrap();

        assert_eq!(detail.id(), MovieId(550));
        assert_eq!(detail.summary.title, "Fight Club");
        assert_eq!(detail.genres[0].name, "Drama");
        assert!(detail.summary.genre_ids.is_empty());
        assert_eq!(detail.formatted_runtime().as_deref(), Some("2h 19m"));
    }

    #[test]
    fn test_summary_tolerates_missing_optional_fields() {
        let summary: MovieSummary = serde_json::from_str(r#"{"id": 1, "title": "Untitled"}"#).unwrap();

        assert_eq!(summary.release_date, "");
        assert_eq!(summary.release_year(), None);
        assert_eq!(summary.formatted_release_date(), "N/A");
    }

    #[test]
    fn test_image_url_resolution() {
        let url = image_url(
            "https://image.tmdb.org/t/p/",
            Some("/abc.jpg"),
            ImageSize::W500,
            ImageKind::Poster,
        );
        assert_eq!(url, "https://image.tmdb.org/t/p/w500/abc.jpg");

        let missing = image_url("https://image.tmdb.org/t/p", None, ImageSize::W342, ImageKind::Poster);
        assert_eq!(missing, PLACEHOLDER_POSTER_URL);

        let empty = image_url("https://image.tmdb.org/t/p", Some(""), ImageSize::W780, ImageKind::Backdrop);
        assert_eq!(empty, PLACEHOLDER_BACKDROP_URL);
    }

    #[test]
    fn test_formatting_helpers() {
        assert_eq!(format_runtime(45), "45m");
        assert_eq!(format_runtime(120), "2h");
        assert_eq!(format_runtime(125), "2h 5m");
        assert_eq!(truncate_text("Interstellar", 5), "Inter...");
        assert_eq!(truncate_text("Up", 5), "Up");

        let detail: MovieDetail = serde_json::from_str(DETAIL_JSON).unwrap();
        assert_eq!(detail.summary.formatted_rating(), "8.4");
        assert_eq!(detail.summary.formatted_release_date(), "October 15, 1999");
        assert_eq!(detail.summary.release_year(), Some(1999));
    }
}
