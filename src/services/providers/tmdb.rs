/// TMDB API provider
///
/// Authenticated read-only access to The Movie Database. Auth is an
/// `api_key` query parameter on every request; all list endpoints are
/// paginated and this client only ever asks for one page per call.
///
/// The genre catalog is cached in-process for 24 hours with a
/// last-known-good policy: a failed refresh never invalidates the stale
/// catalog.
use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{GenreListResponse, Movie, MovieDetails, Page},
    services::providers::MetadataProvider,
};

const CATALOG_TTL: Duration = Duration::from_secs(24 * 3600);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(12);
const LANGUAGE: &str = "en-US";
/// Minimum vote count for the hidden-gems heuristic; filters out titles
/// whose high rating rests on a handful of votes
const HIDDEN_GEMS_VOTE_FLOOR: &str = "300";

/// Time-stamped genre catalog snapshot.
///
/// The refresh policy is read-check-fetch-write; the write lock makes the
/// replacement atomic, so a concurrent reader sees either the old snapshot
/// or the new one, never a partial overwrite.
pub struct CatalogCache {
    slot: RwLock<Option<CatalogSnapshot>>,
}

struct CatalogSnapshot {
    genres: HashMap<i64, String>,
    fetched_at: Instant,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// The cached catalog, if one was stored within the TTL window of `now`
    pub fn fresh_at(&self, now: Instant) -> Option<HashMap<i64, String>> {
        self.slot
            .read()
            .as_ref()
            .filter(|snapshot| now.duration_since(snapshot.fetched_at) < CATALOG_TTL)
            .map(|snapshot| snapshot.genres.clone())
    }

    /// The cached catalog regardless of age (last-known-good fallback)
    pub fn last_known(&self) -> Option<HashMap<i64, String>> {
        self.slot
            .read()
            .as_ref()
            .map(|snapshot| snapshot.genres.clone())
    }

    /// Replace the snapshot and its timestamp in one step
    pub fn store(&self, genres: HashMap<i64, String>, now: Instant) {
        *self.slot.write() = Some(CatalogSnapshot {
            genres,
            fetched_at: now,
        });
    }

    /// The full refresh policy: serve a fresh snapshot without fetching,
    /// otherwise run `fetch` and store the result. A failed refresh falls
    /// back to the stale snapshot when one exists (last-known-good) and
    /// only errors when no catalog was ever fetched.
    pub async fn get_or_refresh<F, Fut>(
        &self,
        now: Instant,
        fetch: F,
    ) -> AppResult<HashMap<i64, String>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = AppResult<HashMap<i64, String>>>,
    {
        if let Some(genres) = self.fresh_at(now) {
            return Ok(genres);
        }

        match fetch().await {
            Ok(genres) => {
                self.store(genres.clone(), now);
                tracing::info!(genres = genres.len(), "Genre catalog refreshed");
                Ok(genres)
            }
            Err(e) => match self.last_known() {
                Some(stale) => {
                    tracing::warn!(error = %e, "Genre catalog refresh failed, serving stale catalog");
                    Ok(stale)
                }
                None => Err(e),
            },
        }
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    catalog: CatalogCache,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        let http_client = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            api_key,
            api_url,
            catalog: CatalogCache::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// One authenticated GET; non-2xx becomes `ExternalApi` with the
    /// upstream status and body so operators see what TMDB actually said
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let response = self
            .http_client
            .get(self.url(path))
            .query(&[("api_key", self.api_key.as_str()), ("language", LANGUAGE)])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn get_movie_page(&self, path: &str, query: &[(&str, &str)]) -> AppResult<Vec<Movie>> {
        let page: Page<Movie> = self.get_json(path, query).await?;
        Ok(page.results)
    }

    async fn fetch_genres(&self) -> AppResult<HashMap<i64, String>> {
        let response: GenreListResponse = self.get_json("/genre/movie/list", &[]).await?;
        Ok(response
            .genres
            .into_iter()
            .map(|genre| (genre.id, genre.name))
            .collect())
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn genre_catalog(&self) -> AppResult<HashMap<i64, String>> {
        self.catalog
            .get_or_refresh(Instant::now(), || self.fetch_genres())
            .await
    }

    async fn search_title(&self, query: &str, page: i64) -> AppResult<Vec<Movie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let page = page.to_string();
        let results = self
            .get_movie_page(
                "/search/movie",
                &[
                    ("query", query),
                    ("page", page.as_str()),
                    ("include_adult", "false"),
                ],
            )
            .await?;

        tracing::info!(query = %query, results = results.len(), "Title search completed");
        Ok(results)
    }

    async fn trending(&self, page: i64) -> AppResult<Vec<Movie>> {
        let page = page.to_string();
        self.get_movie_page("/trending/movie/week", &[("page", page.as_str())])
            .await
    }

    async fn discover_by_genres(&self, genre_ids: &[i64], page: i64) -> AppResult<Vec<Movie>> {
        // Comma-joined ids are OR semantics on the provider side: a record
        // matches if it carries any of the ids, not all of them
        let with_genres = genre_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let page = page.to_string();

        self.get_movie_page(
            "/discover/movie",
            &[
                ("with_genres", with_genres.as_str()),
                ("sort_by", "popularity.desc"),
                ("page", page.as_str()),
                ("include_adult", "false"),
            ],
        )
        .await
    }

    async fn hidden_gems(&self, page: i64) -> AppResult<Vec<Movie>> {
        let page = page.to_string();
        self.get_movie_page(
            "/discover/movie",
            &[
                ("sort_by", "vote_average.desc"),
                ("vote_count.gte", HIDDEN_GEMS_VOTE_FLOOR),
                ("page", page.as_str()),
                ("include_adult", "false"),
            ],
        )
        .await
    }

    async fn similar(&self, movie_id: i64, page: i64) -> AppResult<Vec<Movie>> {
        let page = page.to_string();
        self.get_movie_page(
            &format!("/movie/{}/similar", movie_id),
            &[("page", page.as_str())],
        )
        .await
    }

    async fn recommendations(&self, movie_id: i64, page: i64) -> AppResult<Vec<Movie>> {
        let page = page.to_string();
        self.get_movie_page(
            &format!("/movie/{}/recommendations", movie_id),
            &[("page", page.as_str())],
        )
        .await
    }

    async fn movie_details(&self, movie_id: i64) -> AppResult<MovieDetails> {
        self.get_json(&format!("/movie/{}", movie_id), &[]).await
    }
}
