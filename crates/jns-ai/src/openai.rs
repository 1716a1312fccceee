use reqwest::blocking::Client;

use crate::{AiError, build_http_client};

/// Client for OpenAI-compatible chat-completions endpoints.
pub struct OpenAiClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(endpoint: &str, model: &str, api_key: &str) -> Result<Self, AiError> {
        Ok(Self {
            http: build_http_client()?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        });
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| AiError::Http(format!("POST {url}: {e}")))?;
        if !response.status().is_success() {
            return Err(AiError::Http(format!(
                "POST {url}: status {}",
                response.status()
            )));
        }
        let reply: serde_json::Value = response
            .json()
            .map_err(|e| AiError::Parse(format!("POST {url}: {e}")))?;
        reply["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| AiError::Parse("missing message content in reply".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_extracts_the_first_choice() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices": [{"message": {"role": "assistant", "content": "compilation failed"}}]}"#,
            )
            .create();

        let client = OpenAiClient::new(&server.url(), "gpt-4o-mini", "sk-test").unwrap();
        let reply = client.generate("why did it fail?").unwrap();
        assert_eq!(reply, "compilation failed");
        mock.assert();
    }

    #[test]
    fn missing_content_is_a_parse_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create();

        let client = OpenAiClient::new(&server.url(), "gpt-4o-mini", "sk-test").unwrap();
        assert!(matches!(
            client.generate("hello"),
            Err(AiError::Parse(_))
        ));
    }
}
