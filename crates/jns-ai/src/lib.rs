mod ollama;
mod openai;
mod prompt;

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;
pub use prompt::analyze_log_prompt;

use jns_config::{AiProvider, AiSettings};

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("failed to parse model response: {0}")]
    Parse(String),
    #[error("AI provider is not configured; run `jns ai configure`")]
    NotConfigured,
}

/// LLM client selected by the configured provider.
pub enum LlmClient {
    OpenAi(OpenAiClient),
    Ollama(OllamaClient),
}

impl LlmClient {
    pub fn from_settings(settings: &AiSettings) -> Result<Self, AiError> {
        match settings.provider {
            AiProvider::OpenAi => {
                let api_key = settings.api_key.as_deref().ok_or(AiError::NotConfigured)?;
                Ok(LlmClient::OpenAi(OpenAiClient::new(
                    &settings.endpoint,
                    &settings.model,
                    api_key,
                )?))
            }
            AiProvider::Ollama => Ok(LlmClient::Ollama(OllamaClient::new(
                &settings.endpoint,
                &settings.model,
            )?)),
        }
    }

    /// Send one prompt and return the model's text reply.
    pub fn generate(&self, prompt: &str) -> Result<String, AiError> {
        match self {
            LlmClient::OpenAi(client) => client.generate(prompt),
            LlmClient::Ollama(client) => client.generate(prompt),
        }
    }
}

pub(crate) fn build_http_client() -> Result<reqwest::blocking::Client, AiError> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(120))
        .build()
        .map_err(|e| AiError::Http(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_without_key_is_not_configured() {
        let settings = AiSettings {
            provider: AiProvider::OpenAi,
            endpoint: "https://api.openai.com".into(),
            model: "gpt-4o-mini".into(),
            api_key: None,
        };
        assert!(matches!(
            LlmClient::from_settings(&settings),
            Err(AiError::NotConfigured)
        ));
    }

    #[test]
    fn ollama_needs_no_key() {
        let settings = AiSettings {
            provider: AiProvider::Ollama,
            endpoint: "http://localhost:11434".into(),
            model: "llama3".into(),
            api_key: None,
        };
        assert!(LlmClient::from_settings(&settings).is_ok());
    }
}
