use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key (query-parameter auth on every request)
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB poster image base URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Ollama generate endpoint for the optional assist mode
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Model name sent to the generation backend
    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,

    /// Number of cards rendered per reply
    #[serde(default = "default_recommendations_count")]
    pub recommendations_count: usize,

    /// Route turns through the generative assist handler instead of the
    /// heuristic engine
    #[serde(default)]
    pub cinemate_assist: bool,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434/api/generate".to_string()
}

fn default_ollama_model() -> String {
    "mistral".to_string()
}

fn default_recommendations_count() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
