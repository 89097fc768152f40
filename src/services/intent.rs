/// Keyword-heuristic intent classification
///
/// Deliberately substring-based, not NLP. Classification is a stateless
/// function of the case-folded text, evaluated in a fixed precedence order
/// where the first match wins. The off-topic gate runs before everything
/// else, so text like "underrated bands" with no movie-domain trigger word
/// is off-topic even though the hidden-gems keywords would match.
use crate::models::Intent;

/// Movie-domain trigger vocabulary for the off-topic gate
const TRIGGER_WORDS: [&str; 16] = [
    "movie", "film", "series", "show", "actor", "director", "tv", "cinema", "recommend", "watch",
    "like", "similar", "trending", "hidden", "weekend", "tonight",
];

/// Phrases that introduce a similar-to title, checked in this order
const SIMILAR_PHRASES: [&str; 3] = ["like ", "similar to ", "more like "];

const HIDDEN_GEMS_WORDS: [&str; 3] = ["hidden", "underrated", "gems"];

const WEEKEND_WORDS: [&str; 6] = ["weekend", "tonight", "friday", "saturday", "sunday", "binge"];

/// Genre keyword -> catalog display name
const GENRE_KEYWORDS: [(&str, &str); 11] = [
    ("action", "Action"),
    ("comedy", "Comedy"),
    ("romance", "Romance"),
    ("thriller", "Thriller"),
    ("sci-fi", "Science Fiction"),
    ("science fiction", "Science Fiction"),
    ("drama", "Drama"),
    ("horror", "Horror"),
    ("animation", "Animation"),
    ("mystery", "Mystery"),
    ("fantasy", "Fantasy"),
];

/// Classify one user turn. `has_known_genres` is the only session input:
/// it decides the genre-recommend vs. general-fallback tail.
pub fn classify(text: &str, has_known_genres: bool) -> Intent {
    let folded = text.to_lowercase();

    if !TRIGGER_WORDS.iter().any(|word| folded.contains(word)) {
        return Intent::OffTopic;
    }

    if let Some(title) = extract_similar_title(&folded) {
        return Intent::SimilarTo(title);
    }

    if HIDDEN_GEMS_WORDS.iter().any(|word| folded.contains(word)) {
        return Intent::HiddenGems;
    }

    if WEEKEND_WORDS.iter().any(|word| folded.contains(word)) {
        return Intent::Weekend;
    }

    if has_known_genres || !extract_genres(&folded).is_empty() {
        return Intent::GenreRecommend;
    }

    Intent::General
}

/// Genre display names mentioned in the text, de-duplicated, in the fixed
/// table order. Idempotent: re-running on the same text yields the same
/// list.
pub fn extract_genres(text: &str) -> Vec<String> {
    let folded = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();
    for (keyword, display_name) in GENRE_KEYWORDS {
        if folded.contains(keyword) && !found.iter().any(|name| name == display_name) {
            found.push(display_name.to_string());
        }
    }
    found
}

/// Title candidate for the similar-to intent: everything after the last
/// occurrence of the first matching phrase, trimmed of whitespace and
/// trailing punctuation. Expects case-folded input; an empty candidate
/// counts as no match.
fn extract_similar_title(folded: &str) -> Option<String> {
    for phrase in SIMILAR_PHRASES {
        if let Some(idx) = folded.rfind(phrase) {
            let candidate = folded[idx + phrase.len()..]
                .trim_matches(|c: char| c.is_whitespace() || ".?!".contains(c));
            if !candidate.is_empty() {
                return Some(candidate.to_string());
            }
        }
    }
    None
}
