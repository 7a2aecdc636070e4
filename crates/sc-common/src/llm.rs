//! Optional LLM-backed justification generation.
//!
//! The decision engine talks to a [`Justifier`] trait object; the HTTP
//! implementation targets any OpenAI-compatible chat completions endpoint.
//! Every failure path degrades to the deterministic template upstream, so
//! nothing here is allowed to abort an evaluation run.

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::info;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Error)]
pub enum JustifierError {
    /// No justifier is configured. Callers treat this silently.
    #[error("no justifier configured")]
    Unavailable,
    #[error("justifier request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("malformed justifier response: {0}")]
    MalformedResponse(String),
}

/// Produces a free-text justification from a prompt.
pub trait Justifier: Send + Sync {
    fn name(&self) -> &str;
    fn generate(&self, prompt: &str) -> Result<String, JustifierError>;
}

/// Always-unavailable justifier; the engine falls back to its template.
pub struct NullJustifier;

impl Justifier for NullJustifier {
    fn name(&self) -> &str {
        "null"
    }

    fn generate(&self, _prompt: &str) -> Result<String, JustifierError> {
        Err(JustifierError::Unavailable)
    }
}

#[derive(Debug, Clone)]
pub struct HttpJustifierConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for HttpJustifierConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl HttpJustifierConfig {
    /// Reads `SC_LLM_*` variables, falling back to `OPENAI_API_KEY` for the
    /// key so existing shells keep working.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: std::env::var("SC_LLM_ENDPOINT").unwrap_or(defaults.endpoint),
            model: std::env::var("SC_LLM_MODEL").unwrap_or(defaults.model),
            api_key: std::env::var("SC_LLM_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .unwrap_or_default(),
            timeout_secs: std::env::var("SC_LLM_TIMEOUT_SECONDS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

/// Chat-completions client. The request timeout is enforced by the
/// underlying blocking client, configured once at construction.
pub struct HttpJustifier {
    config: HttpJustifierConfig,
    client: reqwest::blocking::Client,
}

impl HttpJustifier {
    pub fn new(config: HttpJustifierConfig) -> Result<Self, JustifierError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }
}

impl Justifier for HttpJustifier {
    fn name(&self) -> &str {
        &self.config.model
    }

    fn generate(&self, prompt: &str) -> Result<String, JustifierError> {
        let body = json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()?
            .error_for_status()?;

        let completion: ChatCompletion = response.json()?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| JustifierError::MalformedResponse("no choices in response".to_string()))
    }
}

/// Builds the justifier from the environment: HTTP-backed when
/// `SC_LLM_ENABLED=1` and an API key is present, null otherwise.
pub fn justifier_from_env() -> Box<dyn Justifier> {
    let enabled = std::env::var("SC_LLM_ENABLED")
        .map(|raw| raw == "1" || raw.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if !enabled {
        return Box::new(NullJustifier);
    }

    let config = HttpJustifierConfig::from_env();
    if config.api_key.is_empty() {
        info!("llm justifier enabled but no api key found, using template justifications");
        return Box::new(NullJustifier);
    }

    match HttpJustifier::new(config) {
        Ok(justifier) => {
            info!(model = justifier.name(), "llm justifier enabled");
            Box::new(justifier)
        }
        Err(_) => Box::new(NullJustifier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_justifier_is_unavailable() {
        let err = NullJustifier.generate("peu importe").unwrap_err();
        assert!(matches!(err, JustifierError::Unavailable));
    }

    #[test]
    fn default_config_targets_chat_completions() {
        let config = HttpJustifierConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn completion_response_parses_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"Bonne analyse."}}]}"#;
        let completion: ChatCompletion = serde_json::from_str(raw).unwrap();
        assert_eq!(completion.choices[0].message.content, "Bonne analyse.");
    }
}
