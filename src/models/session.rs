/// Classified conversational purpose of one user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Text contains no movie-domain trigger word; gets the fixed redirect
    OffTopic,
    /// "like <title>" and friends; carries the extracted title candidate
    SimilarTo(String),
    HiddenGems,
    Weekend,
    /// Session genres (known or freshly extracted) drive a discover query
    GenreRecommend,
    /// Nothing more specific matched; falls back to trending
    General,
}

/// Per-conversation state.
///
/// `preferred_genres` is append-once: it is populated by the first
/// successful genre extraction and never cleared or overwritten for the
/// session's lifetime. No persistence across process restarts.
#[derive(Debug, Default)]
pub struct Session {
    preferred_genres: Vec<String>,
    greeted: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preferred_genres(&self) -> &[String] {
        &self.preferred_genres
    }

    pub fn has_genres(&self) -> bool {
        !self.preferred_genres.is_empty()
    }

    /// Record extracted genres on the Fresh -> GenresKnown transition.
    /// Returns true only the first time genres are stored; later calls
    /// leave the session untouched.
    pub fn adopt_genres(&mut self, genres: Vec<String>) -> bool {
        if self.preferred_genres.is_empty() && !genres.is_empty() {
            self.preferred_genres = genres;
            true
        } else {
            false
        }
    }

    pub fn mark_greeted(&mut self) {
        self.greeted = true;
    }

    pub fn greeted(&self) -> bool {
        self.greeted
    }
}
