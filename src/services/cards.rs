/// Card rendering
///
/// A card is a pure projection of one catalog record into a fixed
/// five-line block. Every upstream field is optional and every line has a
/// defined fallback, so a record carrying nothing but an id still renders
/// a complete card.
use crate::models::Movie;

/// Hook excerpts longer than this are cut to `HOOK_CUT` chars plus "..."
const HOOK_MAX: usize = 120;
const HOOK_CUT: usize = 117;

const DEFAULT_HOOK: &str = "A little mystery makes it fun.";
const POSTER_UNAVAILABLE: &str = "[Poster unavailable]";

pub struct CardFormatter {
    image_base_url: String,
}

impl CardFormatter {
    pub fn new(image_base_url: String) -> Self {
        Self { image_base_url }
    }

    /// Poster URL for a provider path. `None` in, sentinel-worthy `None`
    /// out; never a malformed URL built from an empty path.
    pub fn poster_url(&self, path: Option<&str>) -> Option<String> {
        match path {
            Some(p) if !p.is_empty() => Some(format!("{}{}", self.image_base_url, p)),
            _ => None,
        }
    }

    /// Render one record as a five-line card
    pub fn format_card(&self, movie: &Movie) -> String {
        // Search payloads carry bare genre ids, not names; raw ids are
        // accepted here rather than treated as an error
        let genre_text = if movie.genre_ids.is_empty() {
            "Unknown".to_string()
        } else {
            movie
                .genre_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let rating = match movie.vote_average {
            Some(vote) => format!("⭐ Rating: {:.1}/10", vote),
            None => "⭐ Rating: N/A".to_string(),
        };

        let hook = truncate_hook(
            movie
                .overview
                .as_deref()
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .unwrap_or(DEFAULT_HOOK),
        );

        let poster = self
            .poster_url(movie.poster_path.as_deref())
            .unwrap_or_else(|| POSTER_UNAVAILABLE.to_string());

        [
            format!("🎬 {} ({})", movie.display_title(), movie.release_year()),
            format!("Genre: {}", genre_text),
            rating,
            format!("📝 Hook: {}", hook),
            format!("Poster: {}", poster),
        ]
        .join("\n")
    }

    /// Render a list of records, blank-line separated
    pub fn format_cards(&self, movies: &[Movie]) -> String {
        movies
            .iter()
            .map(|movie| self.format_card(movie))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn truncate_hook(text: &str) -> String {
    // Char-counted, not byte-sliced, so multibyte overviews never split
    if text.chars().count() > HOOK_MAX {
        let cut: String = text.chars().take(HOOK_CUT).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
