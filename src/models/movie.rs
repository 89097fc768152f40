use serde::{Deserialize, Serialize};

/// One catalog record returned by the metadata provider.
///
/// Every field beyond the id is optional upstream: search payloads routinely
/// omit overviews and posters, and TV-flavored records carry `name` instead
/// of `title`. Rendering must survive a record with nothing but an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    /// Alternate name field used by TV-shaped payloads
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl Movie {
    /// Display title: `title`, falling back to `name`, then "Unknown"
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("Unknown")
    }

    /// Release year derived from the first 4 characters of the date
    /// string, or "?" when absent or too short
    pub fn release_year(&self) -> &str {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .unwrap_or("?")
    }
}

/// Provider pagination envelope for list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub page: i64,
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default)]
    pub total_results: i64,
}

/// One entry of the provider's genre catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct GenreListResponse {
    pub genres: Vec<Genre>,
}

/// Per-title details payload; unlike list records it resolves genres to
/// named objects
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl From<MovieDetails> for Movie {
    fn from(details: MovieDetails) -> Self {
        Movie {
            id: details.id,
            title: details.title,
            name: None,
            release_date: details.release_date,
            genre_ids: details.genres.iter().map(|g| g.id).collect(),
            vote_average: details.vote_average,
            vote_count: None,
            overview: details.overview,
            poster_path: details.poster_path,
        }
    }
}
