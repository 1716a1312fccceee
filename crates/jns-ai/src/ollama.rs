use reqwest::blocking::Client;

use crate::{AiError, build_http_client};

/// Client for a local Ollama server.
pub struct OllamaClient {
    http: Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn new(endpoint: &str, model: &str) -> Result<Self, AiError> {
        Ok(Self {
            http: build_http_client()?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });
        let response = self
            .http
            .post(&url)
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
        reply["response"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| AiError::Parse("missing response field in reply".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_reads_the_response_field() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"model": "llama3", "response": "the test stage timed out", "done": true}"#)
            .create();

        let client = OllamaClient::new(&server.url(), "llama3").unwrap();
        let reply = client.generate("summarize").unwrap();
        assert_eq!(reply, "the test stage timed out");
        mock.assert();
    }

    #[test]
    fn http_errors_carry_the_status() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("POST", "/api/generate").with_status(500).create();

        let client = OllamaClient::new(&server.url(), "llama3").unwrap();
        let err = client.generate("summarize").unwrap_err();
        assert!(err.to_string().contains("500"));
    }
}
