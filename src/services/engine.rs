/// Conversation engine
///
/// Owns the per-session state and dispatches each classified turn to its
/// composition routine. Every turn produces exactly one reply string; the
/// only error that escapes is an unrecovered transport failure, which the
/// front-end surfaces distinctly from a legitimate "nothing found" reply.
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Intent, Movie, Session},
    services::{cards::CardFormatter, intent, providers::MetadataProvider},
};

pub const WELCOME_PROMPT: &str = "Hey there! I'm Cinemate, your movie bestie 🍿✨\n\
    Before we dive into the good stuff, what are your favorite genres?\n\
    Try a few like: Action, Comedy, Romance, Thriller, Sci-Fi, Drama, Horror, Animation, Mystery, Fantasy.";

const OFF_TOPIC_REPLY: &str = "I'm all about the movies, bestie 🎬 Let's chat films, shows, \
    actors, soundtracks—tell me a genre you love or ask for a recommendation!";

const MIXED_SENTIMENT_DISCLAIMER: &str = "Some reviews weren't very positive… but hey, taste is \
    personal, and you might still enjoy it if it fits your vibe ✨. Want more?";

const NOTHING_FOUND: &str = "Oops, no movies found. Try another genre or title!";

pub struct DialogueEngine {
    provider: Arc<dyn MetadataProvider>,
    formatter: CardFormatter,
    session: Session,
    count: usize,
}

impl DialogueEngine {
    pub fn new(provider: Arc<dyn MetadataProvider>, formatter: CardFormatter, count: usize) -> Self {
        Self {
            provider,
            formatter,
            session: Session::new(),
            count,
        }
    }

    /// Session-start prompt, emitted exactly once before any user turn
    pub fn opening(&mut self) -> String {
        self.session.mark_greeted();
        WELCOME_PROMPT.to_string()
    }

    /// Handle one user turn
    pub async fn reply(&mut self, user_text: &str) -> AppResult<String> {
        let intent = intent::classify(user_text, self.session.has_genres());
        tracing::debug!(?intent, "Turn classified");

        // Off-topic short-circuits before any state mutation or network call
        if intent == Intent::OffTopic {
            return Ok(OFF_TOPIC_REPLY.to_string());
        }

        // Genre detection runs after the gate; the Fresh -> GenresKnown
        // transition fires at most once per session
        let acknowledged = self
            .session
            .adopt_genres(intent::extract_genres(user_text))
            .then(|| {
                format!(
                    "Nice picks! I'll keep {} at the top of my list 🎬",
                    self.session.preferred_genres().join(", ")
                )
            });

        let body = match intent {
            Intent::OffTopic => OFF_TOPIC_REPLY.to_string(),
            Intent::SimilarTo(title) => self.recommend_similar(&title).await?,
            Intent::HiddenGems => self.hidden_gems().await?,
            Intent::Weekend => self.weekend_picks().await?,
            Intent::GenreRecommend => self.recommend_by_genres().await?,
            Intent::General => self.general_fallback().await?,
        };

        Ok(match acknowledged {
            Some(ack) => format!("{}\n\n{}", ack, body),
            None => body,
        })
    }

    fn take<'a>(&self, movies: &'a [Movie]) -> &'a [Movie] {
        &movies[..movies.len().min(self.count)]
    }

    async fn recommend_similar(&self, title_query: &str) -> AppResult<String> {
        let search = self.provider.search_title(title_query, 1).await?;
        let Some(hit) = search.first() else {
            return Ok(format!(
                "I couldn't find '{}'. Maybe try the exact title or another one?",
                title_query
            ));
        };

        // Similar and recommendations are distinct provider algorithms;
        // recommendations is a fallback, never merged in
        let related = match self.provider.similar(hit.id, 1).await {
            Ok(movies) if !movies.is_empty() => movies,
            Ok(_) => self.provider.recommendations(hit.id, 1).await?,
            Err(e) => {
                tracing::warn!(error = %e, movie_id = hit.id, "Similar lookup failed, trying recommendations");
                self.provider.recommendations(hit.id, 1).await?
            }
        };

        if related.is_empty() {
            return Ok(NOTHING_FOUND.to_string());
        }

        Ok(format!(
            "If you liked '{}', you might vibe with these 🎬:\n\n{}\n\nWant more like this?",
            hit.display_title(),
            self.formatter.format_cards(self.take(&related))
        ))
    }

    async fn hidden_gems(&self) -> AppResult<String> {
        let movies = self.provider.hidden_gems(1).await?;
        if movies.is_empty() {
            return Ok(NOTHING_FOUND.to_string());
        }

        Ok(format!(
            "Hidden gems time ✨ These may have flown under the radar, but they sparkle:\n\n{}\n\n{}",
            self.formatter.format_cards(self.take(&movies)),
            MIXED_SENTIMENT_DISCLAIMER
        ))
    }

    async fn weekend_picks(&self) -> AppResult<String> {
        // Presentation-only variant of the trending fallback
        let movies = self.provider.trending(1).await?;
        if movies.is_empty() {
            return Ok(NOTHING_FOUND.to_string());
        }

        Ok(format!(
            "Weekend picks coming right up 🎉 Cozy blanket optional, snacks mandatory:\n\n{}\n\nWant me to tailor these tighter to a genre or era?",
            self.formatter.format_cards(self.take(&movies))
        ))
    }

    async fn recommend_by_genres(&self) -> AppResult<String> {
        let genres = self.session.preferred_genres().to_vec();
        let ids = self.genre_ids_for(&genres).await;

        if ids.is_empty() {
            let movies = self.provider.trending(1).await?;
            if movies.is_empty() {
                return Ok(NOTHING_FOUND.to_string());
            }
            return Ok(format!(
                "Couldn't match those genres perfectly, but here's what's hot this week 🔥\n\n{}\n\nWant more like this?",
                self.formatter.format_cards(self.take(&movies))
            ));
        }

        let movies = self.provider.discover_by_genres(&ids, 1).await?;
        if movies.is_empty() {
            return Ok(NOTHING_FOUND.to_string());
        }

        Ok(format!(
            "Handpicked {} picks just for you 🍿:\n\n{}\n\nWant more like this? Should I find similar ones from another language/era?",
            genres.join(", "),
            self.formatter.format_cards(self.take(&movies))
        ))
    }

    async fn general_fallback(&self) -> AppResult<String> {
        let movies = self.provider.trending(1).await?;
        if movies.is_empty() {
            return Ok(NOTHING_FOUND.to_string());
        }

        Ok(format!(
            "Hot right now 🔥 Here's what people are buzzing about:\n\n{}\n\nWant more like this? Should I find similar ones from another language/era?",
            self.formatter.format_cards(self.take(&movies))
        ))
    }

    /// Case-insensitive reverse lookup of genre display names against the
    /// provider catalog. Unresolvable names are skipped; a catalog fetch
    /// failure degrades to "no ids" so the turn falls back to trending
    /// instead of failing.
    async fn genre_ids_for(&self, names: &[String]) -> Vec<i64> {
        let catalog = match self.provider.genre_catalog().await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(error = %e, "Genre catalog unavailable, falling back to trending");
                return Vec::new();
            }
        };

        names
            .iter()
            .filter_map(|name| {
                catalog
                    .iter()
                    .find(|(_, display)| display.eq_ignore_ascii_case(name))
                    .map(|(id, _)| *id)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockMetadataProvider;
    use std::collections::HashMap;

    fn fixture(id: i64, title: &str) -> Movie {
        Movie {
            id,
            title: Some(title.to_string()),
            name: None,
            release_date: Some("2019-05-30".to_string()),
            genre_ids: vec![28],
            vote_average: Some(7.2),
            vote_count: Some(1200),
            overview: Some("Fixture overview.".to_string()),
            poster_path: None,
        }
    }

    fn engine(provider: MockMetadataProvider) -> DialogueEngine {
        DialogueEngine::new(
            Arc::new(provider),
            CardFormatter::new("https://image.test".to_string()),
            5,
        )
    }

    #[tokio::test]
    async fn test_off_topic_issues_no_network_calls() {
        // No expectations set: any provider call would panic the mock
        let mut engine = engine(MockMetadataProvider::new());
        let reply = engine.reply("how is the weather today?").await.unwrap();
        assert_eq!(reply, OFF_TOPIC_REPLY);
    }

    #[tokio::test]
    async fn test_genre_acknowledgment_fires_exactly_once() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_genre_catalog()
            .times(2)
            .returning(|| Ok(HashMap::from([(28, "Action".to_string())])));
        provider
            .expect_discover_by_genres()
            .times(2)
            .withf(|ids, page| ids == [28] && *page == 1)
            .returning(|_, _| Ok(vec![fixture(1, "Mad Max: Fury Road")]));

        let mut engine = engine(provider);

        let first = engine.reply("recommend an action movie").await.unwrap();
        assert!(first.starts_with("Nice picks! I'll keep Action"));

        // Restating the genre never re-triggers the acknowledgment
        let second = engine.reply("recommend an action movie").await.unwrap();
        assert!(!second.contains("Nice picks!"));
        assert!(second.contains("Handpicked Action picks"));
    }

    #[tokio::test]
    async fn test_similar_falls_back_to_recommendations_on_empty() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_search_title()
            .withf(|query, _| query == "the matrix")
            .returning(|_, _| Ok(vec![fixture(603, "The Matrix")]));
        provider
            .expect_similar()
            .withf(|id, _| *id == 603)
            .returning(|_, _| Ok(vec![]));
        provider
            .expect_recommendations()
            .withf(|id, _| *id == 603)
            .returning(|_, _| Ok(vec![fixture(604, "Dark City")]));

        let mut engine = engine(provider);
        let reply = engine
            .reply("recommend something like The Matrix")
            .await
            .unwrap();

        assert!(reply.contains("If you liked 'The Matrix'"));
        assert!(reply.contains("Dark City"));
    }

    #[tokio::test]
    async fn test_similar_results_are_never_merged_with_recommendations() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_search_title()
            .returning(|_, _| Ok(vec![fixture(603, "The Matrix")]));
        provider
            .expect_similar()
            .returning(|_, _| Ok(vec![fixture(605, "Equilibrium")]));
        // No expect_recommendations: calling it would panic the mock

        let mut engine = engine(provider);
        let reply = engine.reply("movies similar to The Matrix").await.unwrap();
        assert!(reply.contains("Equilibrium"));
    }

    #[tokio::test]
    async fn test_similar_title_not_found() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_search_title()
            .returning(|_, _| Ok(vec![]));

        let mut engine = engine(provider);
        let reply = engine
            .reply("anything like Zzyzx Quadrilogy?")
            .await
            .unwrap();
        assert!(reply.contains("I couldn't find 'zzyzx quadrilogy'"));
    }

    #[tokio::test]
    async fn test_hidden_gems_scenario() {
        let movies: Vec<Movie> = (1..=8)
            .map(|i| fixture(i, &format!("Gem {}", i)))
            .collect();
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_hidden_gems()
            .withf(|page| *page == 1)
            .returning(move |_| Ok(movies.clone()));

        let mut engine = engine(provider);
        let reply = engine.reply("hidden gems please, any movie").await.unwrap();

        // Renders up to 5 cards plus the fixed disclaimer
        assert_eq!(reply.matches("🎬 Gem").count(), 5);
        assert!(reply.contains("Some reviews weren't very positive"));
    }

    #[tokio::test]
    async fn test_weekend_uses_trending() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_trending()
            .withf(|page| *page == 1)
            .returning(|_| Ok(vec![fixture(10, "Cozy Pick")]));

        let mut engine = engine(provider);
        let reply = engine.reply("what should i watch tonight").await.unwrap();
        assert!(reply.contains("Weekend picks coming right up"));
        assert!(reply.contains("Cozy Pick"));
    }

    #[tokio::test]
    async fn test_unresolvable_genres_degrade_to_trending() {
        let mut provider = MockMetadataProvider::new();
        // Catalog has no "Action" entry, so the lookup yields zero ids
        provider
            .expect_genre_catalog()
            .returning(|| Ok(HashMap::from([(35, "Comedy".to_string())])));
        provider
            .expect_trending()
            .returning(|_| Ok(vec![fixture(20, "Trending Pick")]));

        let mut engine = engine(provider);
        let reply = engine.reply("recommend an action movie").await.unwrap();
        assert!(reply.contains("Couldn't match those genres perfectly"));
        assert!(reply.contains("Trending Pick"));
    }

    #[tokio::test]
    async fn test_general_fallback_without_known_genres() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_trending()
            .returning(|_| Ok(vec![fixture(30, "Buzzing Pick")]));

        let mut engine = engine(provider);
        let reply = engine.reply("recommend me something to watch").await.unwrap();
        assert!(reply.contains("Hot right now"));
        assert!(reply.contains("Buzzing Pick"));
    }

    #[tokio::test]
    async fn test_weekend_with_empty_trending_says_nothing_found() {
        let mut provider = MockMetadataProvider::new();
        provider.expect_trending().returning(|_| Ok(vec![]));

        let mut engine = engine(provider);
        let reply = engine.reply("movie for the weekend please").await.unwrap();

        // An empty window renders the nothing-found message, never a
        // framed reply wrapped around a blank card block
        assert_eq!(reply, NOTHING_FOUND);
        assert!(!reply.contains("Weekend picks coming right up"));
    }

    #[tokio::test]
    async fn test_general_fallback_with_empty_trending_says_nothing_found() {
        let mut provider = MockMetadataProvider::new();
        provider.expect_trending().returning(|_| Ok(vec![]));

        let mut engine = engine(provider);
        let reply = engine.reply("recommend me something to watch").await.unwrap();
        assert_eq!(reply, NOTHING_FOUND);
    }

    #[tokio::test]
    async fn test_unresolvable_genres_with_empty_trending_says_nothing_found() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_genre_catalog()
            .returning(|| Ok(HashMap::new()));
        provider.expect_trending().returning(|_| Ok(vec![]));

        let mut engine = engine(provider);
        let reply = engine.reply("recommend an action movie").await.unwrap();
        // The first-time genre acknowledgment still applies; the body is
        // the nothing-found message
        assert!(reply.ends_with(NOTHING_FOUND));
        assert!(!reply.contains("Couldn't match those genres"));
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_as_error() {
        let mut provider = MockMetadataProvider::new();
        provider.expect_trending().returning(|_| {
            Err(crate::error::AppError::ExternalApi(
                "TMDB returned status 503: upstream down".to_string(),
            ))
        });

        let mut engine = engine(provider);
        let result = engine.reply("recommend me something to watch").await;
        assert!(matches!(result, Err(e) if e.is_transport()));
    }
}
