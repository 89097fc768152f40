/// Text-generation backend (Ollama)
///
/// Consumed as an opaque function: prompt in, reply text out, empty string
/// on any failure. No schema is enforced on success beyond best-effort
/// JSON, so the parse result is a tagged value the caller must handle
/// exhaustively.
use serde::Deserialize;

const GENERATION_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Outcome of parsing a backend reply
#[derive(Debug, Clone, PartialEq)]
pub enum BackendReply {
    /// The backend produced the requested JSON shape
    Structured {
        intent: String,
        genre: Option<String>,
        query: Option<String>,
        reply: Option<String>,
    },
    /// Non-empty text that is not the requested JSON; shown as-is
    Unstructured(String),
    /// Empty reply, the backend's failure signal
    Failed,
}

#[derive(Debug, Deserialize)]
struct StructuredPayload {
    #[serde(default)]
    intent: Option<String>,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    reply: Option<String>,
}

/// Parse the backend's raw text into the tagged reply
pub fn parse_backend_reply(raw: &str) -> BackendReply {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return BackendReply::Failed;
    }

    match serde_json::from_str::<StructuredPayload>(trimmed) {
        Ok(payload) => match payload.intent {
            Some(intent) => BackendReply::Structured {
                intent,
                genre: payload.genre,
                query: payload.query,
                reply: payload.reply,
            },
            // JSON without an intent key is no more useful than prose
            None => BackendReply::Unstructured(trimmed.to_string()),
        },
        Err(_) => BackendReply::Unstructured(trimmed.to_string()),
    }
}

pub struct OllamaClient {
    http_client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(url: String, model: String) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(GENERATION_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            url,
            model,
        }
    }

    /// Send a prompt to the backend. Returns the reply text, or an empty
    /// string on any failure; generation problems never fail a user turn.
    pub async fn generate(&self, prompt: &str) -> String {
        let payload = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        let response = match self.http_client.post(&self.url).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Generation backend unreachable");
                return String::new();
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Generation backend returned an error");
            return String::new();
        }

        let body: serde_json::Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "Generation backend sent unparseable body");
                return String::new();
            }
        };

        // Response key varies between backend versions
        body.get("response")
            .or_else(|| body.get("text"))
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structured_reply() {
        let raw = r#"{"intent": "recommend", "genre": "romance", "query": "movies like notting hill", "reply": "Here you go!"}"#;
        assert_eq!(
            parse_backend_reply(raw),
            BackendReply::Structured {
                intent: "recommend".to_string(),
                genre: Some("romance".to_string()),
                query: Some("movies like notting hill".to_string()),
                reply: Some("Here you go!".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_structured_with_missing_keys() {
        assert_eq!(
            parse_backend_reply(r#"{"intent": "chat"}"#),
            BackendReply::Structured {
                intent: "chat".to_string(),
                genre: None,
                query: None,
                reply: None,
            }
        );
    }

    #[test]
    fn test_parse_prose_is_unstructured() {
        let raw = "Sure! You might enjoy a cozy romance tonight.";
        assert_eq!(
            parse_backend_reply(raw),
            BackendReply::Unstructured(raw.to_string())
        );
    }

    #[test]
    fn test_parse_json_without_intent_is_unstructured() {
        let raw = r#"{"mood": "cheerful"}"#;
        assert_eq!(
            parse_backend_reply(raw),
            BackendReply::Unstructured(raw.to_string())
        );
    }

    #[test]
    fn test_parse_empty_is_failed() {
        assert_eq!(parse_backend_reply(""), BackendReply::Failed);
        assert_eq!(parse_backend_reply("   \n"), BackendReply::Failed);
    }
}
