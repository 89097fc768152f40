/// Movie metadata provider abstraction
///
/// This module provides a pluggable seam for catalog metadata sources. The
/// engine only ever talks to `dyn MetadataProvider`, so tests can swap in a
/// mock and a different provider can be slotted in without touching the
/// composition logic.
use std::collections::HashMap;

use crate::{error::AppResult, models::{Movie, MovieDetails}};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
///
/// Every method performs one authenticated network read and returns the
/// provider's ranked order unmodified. A transport failure surfaces as an
/// error; it is never flattened into an empty list, so callers can tell
/// "provider is down" apart from "no movies match".
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Genre id -> display name catalog. Implementations may cache this;
    /// see `TmdbProvider` for the 24h refresh policy.
    async fn genre_catalog(&self) -> AppResult<HashMap<i64, String>>;

    /// Exact-text title search, adult content excluded
    async fn search_title(&self, query: &str, page: i64) -> AppResult<Vec<Movie>>;

    /// Rolling-week popularity ranking; the universal fallback when no
    /// more specific intent applies
    async fn trending(&self, page: i64) -> AppResult<Vec<Movie>>;

    /// Discover with an OR-combined genre filter (a record matches if it
    /// carries any of the ids), ordered by popularity descending
    async fn discover_by_genres(&self, genre_ids: &[i64], page: i64) -> AppResult<Vec<Movie>>;

    /// Heuristic "hidden gem" listing: rating descending with a minimum
    /// vote-count floor to exclude low-sample outliers. A precision/recall
    /// trade-off, not a guarantee of obscurity.
    async fn hidden_gems(&self, page: i64) -> AppResult<Vec<Movie>>;

    /// Provider-native similarity listing for one title
    async fn similar(&self, movie_id: i64, page: i64) -> AppResult<Vec<Movie>>;

    /// Provider-native recommendations for one title. A distinct algorithm
    /// from `similar` upstream; the two are only related as a fallback
    /// chain, never merged.
    async fn recommendations(&self, movie_id: i64, page: i64) -> AppResult<Vec<Movie>>;

    /// Full per-title details with resolved genre names
    async fn movie_details(&self, movie_id: i64) -> AppResult<MovieDetails>;
}
