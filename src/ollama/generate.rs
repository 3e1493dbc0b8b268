//! Scoring collaborator over Ollama's `/api/generate`
//!
//! The reply body is itself JSON (`{"response": "...", "done": true, ...}`);
//! only the `response` text is handed back. Whatever structure the model put
//! inside that text is the caller's problem.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::collaborators::TextGenerator;
use crate::config::{HttpConfig, RerankerConfig};
use crate::errors::Result;
use crate::ollama::client::{build_http_client, post_json};

const SERVICE: &str = "scoring";

/// Ollama single-shot generation client
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    client: Client,
    url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    model: String,
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    done_reason: Option<String>,
}

impl OllamaGenerator {
    pub fn new(config: &RerankerConfig, http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(http, SERVICE)?,
            url: config.url.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: user,
            system,
            stream: false,
        };

        let response: GenerateResponse =
            post_json(&self.client, SERVICE, &self.url, &request).await?;

        tracing::debug!(
            model = %response.model,
            done = response.done,
            done_reason = ?response.done_reason,
            raw = %response.response,
            "scoring response received"
        );

        Ok(response.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_generate_returns_response_field() {
        let app = Router::new().route(
            "/api/generate",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["stream"], false);
                assert!(body.get("system").is_none());
                Json(json!({
                    "model": "llama3.2:3b",
                    "created_at": "2024-01-01T00:00:00Z",
                    "response": "\"{\\\"results\\\":[]}\"",
                    "done": true,
                    "done_reason": "stop",
                    "context": [1, 2, 3]
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let config = RerankerConfig {
            url: format!("http://{}/api/generate", addr),
            ..Default::default()
        };
        let generator = OllamaGenerator::new(&config, &HttpConfig::default()).unwrap();

        let text = generator.generate("", "score these").await.unwrap();
        assert_eq!(text, "\"{\\\"results\\\":[]}\"");
    }
}
