//! Answering collaborator over Ollama's `/api/chat`

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::collaborators::TextGenerator;
use crate::config::{HttpConfig, ChatConfig};
use crate::errors::Result;
use crate::ollama::client::{build_http_client, post_json};

const SERVICE: &str = "chat";

/// Ollama chat client (system + user message, non-streaming)
#[derive(Debug, Clone)]
pub struct OllamaChat {
    client: Client,
    url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaChat {
    pub fn new(endpoint: &ChatConfig, http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(http, SERVICE)?,
            url: endpoint.url.clone(),
            model: endpoint.model.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaChat {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            stream: false,
        };

        let response: ChatResponse = post_json(&self.client, SERVICE, &self.url, &request).await?;
        Ok(response.message.content)
    }
}
