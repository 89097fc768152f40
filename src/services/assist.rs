/// Generative assist handler
///
/// Optional alternative to the heuristic engine: the turn is forwarded to
/// the text-generation backend, which is asked for a small JSON envelope
/// (intent/genre/query/reply). Structured replies drive catalog lookups;
/// everything else degrades to showing the backend's own words or a fixed
/// apology. Opted into via the `CINEMATE_ASSIST` flag.
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::Movie,
    services::{
        cards::CardFormatter,
        generation::{parse_backend_reply, BackendReply, OllamaClient},
        providers::MetadataProvider,
    },
};

const GENERIC_APOLOGY: &str = "Sorry, I couldn't understand that.";
const NO_MATCH_REPLY: &str = "I couldn't find any movies like that. Want to try another genre?";
const CHAT_FALLBACK: &str = "Nice! Tell me more about what you like in movies.";
const REPHRASE_FALLBACK: &str = "Hm, I didn't get that. Can you rephrase?";

pub struct AssistHandler {
    provider: Arc<dyn MetadataProvider>,
    backend: OllamaClient,
    formatter: CardFormatter,
    count: usize,
}

impl AssistHandler {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        backend: OllamaClient,
        formatter: CardFormatter,
        count: usize,
    ) -> Self {
        Self {
            provider,
            backend,
            formatter,
            count,
        }
    }

    fn prompt_for(user_text: &str) -> String {
        format!(
            "You are Cinemate, a sweet, chatty movie-buff friend. When given the user's message,\n\
             output a JSON object ONLY with keys: intent, genre, query, reply.\n\
             - intent: one of [\"recommend\",\"info\",\"search\",\"chat\",\"unknown\"]\n\
             - genre: optional (e.g., \"romance\")\n\
             - query: optional text to search TMDB (e.g., \"movies like interstellar\")\n\
             - reply: a short friendly phrase to show the user if no movie is found.\n\
             \n\
             User message: {}",
            user_text
        )
    }

    /// Handle one user turn through the backend
    pub async fn reply(&self, user_text: &str) -> AppResult<String> {
        let raw = self.backend.generate(&Self::prompt_for(user_text)).await;

        match parse_backend_reply(&raw) {
            BackendReply::Failed => Ok(GENERIC_APOLOGY.to_string()),
            BackendReply::Unstructured(text) => Ok(text),
            BackendReply::Structured {
                intent,
                genre,
                query,
                reply,
            } => match intent.as_str() {
                "recommend" | "search" => {
                    let movies = self.lookup(query.as_deref(), genre.as_deref()).await?;
                    if movies.is_empty() {
                        Ok(reply.unwrap_or_else(|| NO_MATCH_REPLY.to_string()))
                    } else {
                        let shown = &movies[..movies.len().min(self.count)];
                        Ok(format!(
                            "Here are some movies I think you'll enjoy:\n\n{}",
                            self.formatter.format_cards(shown)
                        ))
                    }
                }
                "info" => self.title_info(query.as_deref(), reply).await,
                "chat" => Ok(reply.unwrap_or_else(|| CHAT_FALLBACK.to_string())),
                _ => Ok(reply.unwrap_or_else(|| REPHRASE_FALLBACK.to_string())),
            },
        }
    }

    /// Search by query text, or by genre name via the catalog when no
    /// query was produced
    async fn lookup(&self, query: Option<&str>, genre: Option<&str>) -> AppResult<Vec<Movie>> {
        if let Some(query) = query.filter(|q| !q.trim().is_empty()) {
            return self.provider.search_title(query, 1).await;
        }

        let Some(genre) = genre.filter(|g| !g.trim().is_empty()) else {
            return Ok(Vec::new());
        };

        let catalog = self.provider.genre_catalog().await?;
        let ids: Vec<i64> = catalog
            .iter()
            .filter(|(_, name)| name.eq_ignore_ascii_case(genre))
            .map(|(id, _)| *id)
            .collect();

        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.provider.discover_by_genres(&ids, 1).await
    }

    /// "info" intent: one card with the full details payload for the best
    /// search hit
    async fn title_info(&self, query: Option<&str>, reply: Option<String>) -> AppResult<String> {
        let Some(query) = query.filter(|q| !q.trim().is_empty()) else {
            return Ok(reply.unwrap_or_else(|| REPHRASE_FALLBACK.to_string()));
        };

        let search = self.provider.search_title(query, 1).await?;
        let Some(hit) = search.first() else {
            return Ok(reply.unwrap_or_else(|| NO_MATCH_REPLY.to_string()));
        };

        let details = self.provider.movie_details(hit.id).await?;
        Ok(self.formatter.format_card(&Movie::from(details)))
    }
}
