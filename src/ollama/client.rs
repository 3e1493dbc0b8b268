//! Shared HTTP plumbing for the Ollama collaborators
//!
//! One long-lived `reqwest::Client` per collaborator; every call is a single
//! JSON POST whose non-success status is surfaced with its body.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::config::HttpConfig;
use crate::errors::{RagError, Result};

/// Build the HTTP client a collaborator keeps for its lifetime
pub fn build_http_client(config: &HttpConfig, service: &'static str) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|source| RagError::Transport { service, source })
}

/// POST `body` as JSON and decode a JSON reply
pub async fn post_json<Req, Resp>(
    client: &Client,
    service: &'static str,
    url: &str,
    body: &Req,
) -> Result<Resp>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|source| RagError::Transport { service, source })?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::warn!(service, status = status.as_u16(), %body, "collaborator returned error status");
        return Err(RagError::Collaborator {
            service,
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<Resp>()
        .await
        .map_err(|source| RagError::Transport { service, source })
}
