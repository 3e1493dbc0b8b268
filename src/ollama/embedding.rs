//! Embedding collaborator over Ollama's `/api/embeddings`

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::collaborators::Embedder;
use crate::config::{HttpConfig, EmbeddingConfig};
use crate::errors::Result;
use crate::ollama::client::{build_http_client, post_json};

const SERVICE: &str = "embedding";

/// Ollama embedding client
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    client: Client,
    url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f64>,
}

impl OllamaEmbedder {
    pub fn new(endpoint: &EmbeddingConfig, http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(http, SERVICE)?,
            url: endpoint.url.clone(),
            model: endpoint.model.clone(),
        })
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            prompt: text,
            stream: false,
        };

        let response: EmbeddingResponse =
            post_json(&self.client, SERVICE, &self.url, &request).await?;

        tracing::debug!(dimensions = response.embedding.len(), "embedding generated");

        Ok(response.embedding.into_iter().map(|v| v as f32).collect())
    }
}
