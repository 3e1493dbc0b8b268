//! Configuration management for ragbuddy
//!
//! TOML configuration with built-in defaults, validation and environment
//! overrides. Location: ~/.ragbuddy/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{RagError, Result};

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub embedding: EmbeddingConfig,
    pub reranker: RerankerConfig,
    pub chat: ChatConfig,
    pub pipeline: PipelineConfig,
    pub server: ServerConfig,
    pub http: HttpConfig,
}

/// Which vector store implementation backs the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Memory,
    Qdrant,
}

/// Vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub url: String,
    pub collection: String,
    /// Fixed embedding dimensionality enforced on insert and search
    pub dimension: usize,
}

/// Embedding endpoint and model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub url: String,
    pub model: String,
}

/// Answering endpoint and model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub url: String,
    pub model: String,
}

/// Which reranker the orchestrator uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerankStrategy {
    /// Generative scoring with a strict JSON contract
    Model,
    /// Deterministic vector + keyword + length scorer
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankerConfig {
    pub url: String,
    pub model: String,
    pub strategy: RerankStrategy,
}

/// Orchestration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Nearest neighbours fetched per question
    pub search_k: usize,
    /// Deadline for one ask/ingest request; 0 disables it
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

/// Shared settings for the collaborator HTTP clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Qdrant,
            url: "http://127.0.0.1:6334".to_string(),
            collection: "documents".to_string(),
            dimension: 1024,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            embedding: EmbeddingConfig::default(),
            reranker: RerankerConfig::default(),
            chat: ChatConfig::default(),
            pipeline: PipelineConfig::default(),
            server: ServerConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:11434/api/embeddings".to_string(),
            model: "bge-m3".to_string(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:11434/api/chat".to_string(),
            model: "qwen2.5:7b-instruct".to_string(),
        }
    }
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:11434/api/generate".to_string(),
            model: "llama3.2:3b".to_string(),
            strategy: RerankStrategy::Model,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_k: 3,
            request_timeout_secs: 60,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            timeout_secs: 120,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults, then apply the environment
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// [`Config::load`] with an explicit variable lookup
    pub fn load_with<F>(path: Option<PathBuf>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if let Some(config_path) = path {
            Self::load_from_file(&config_path)?
        } else {
            Self::load_default()?
        };

        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RagError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&contents)
    }

    /// Parse configuration text. Sections and fields left out keep their
    /// defaults. Values are not validated here; [`Config::load`] validates
    /// once the environment has been applied.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| RagError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load from the standard location or fall back to built-in defaults
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(config_path) if config_path.exists() => Self::load_from_file(&config_path),
            _ => Ok(Self::default()),
        }
    }

    /// ~/.ragbuddy/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".ragbuddy").join("config.toml"))
    }

    /// Apply variable overrides. `lookup` is `std::env::var` outside tests.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("EMBEDDING_API_URL") {
            self.embedding.url = url;
        }
        if let Some(model) = lookup("EMBEDDING_MODEL") {
            self.embedding.model = model;
        }
        if let Some(url) = lookup("RERANKER_API_URL") {
            self.reranker.url = url;
        }
        if let Some(model) = lookup("RERANKER_MODEL") {
            self.reranker.model = model;
        }
        if let Some(url) = lookup("LLMCHAT_API_URL") {
            self.chat.url = url;
        }
        if let Some(model) = lookup("LLMCHAT_MODEL") {
            self.chat.model = model;
        }
        if let Some(url) = lookup("RAGBUDDY_STORE_URL") {
            self.store.url = url;
        }
        if let Some(addr) = lookup("RAGBUDDY_BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(backend) = lookup("RAGBUDDY_STORE_BACKEND") {
            self.store.backend = match backend.as_str() {
                "memory" => StoreBackend::Memory,
                "qdrant" => StoreBackend::Qdrant,
                other => {
                    return Err(RagError::Config(format!(
                        "Invalid store backend: {}",
                        other
                    )))
                }
            };
        }
        if let Some(strategy) = lookup("RAGBUDDY_RERANK_STRATEGY") {
            self.reranker.strategy = match strategy.as_str() {
                "model" => RerankStrategy::Model,
                "fallback" => RerankStrategy::Fallback,
                other => {
                    return Err(RagError::Config(format!(
                        "Invalid rerank strategy: {}",
                        other
                    )))
                }
            };
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.store.dimension == 0 {
            return Err(RagError::Config(
                "store.dimension must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.search_k == 0 {
            return Err(RagError::Config(
                "pipeline.search_k must be greater than 0".to_string(),
            ));
        }

        if self.http.timeout_secs == 0 || self.http.connect_timeout_secs == 0 {
            return Err(RagError::Config(
                "http timeouts must be greater than 0".to_string(),
            ));
        }

        let endpoints = [
            ("embedding", &self.embedding.url, &self.embedding.model),
            ("reranker", &self.reranker.url, &self.reranker.model),
            ("chat", &self.chat.url, &self.chat.model),
        ];
        for (section, url, model) in endpoints {
            if url.trim().is_empty() || model.trim().is_empty() {
                return Err(RagError::Config(format!(
                    "{}.url and {}.model must be set",
                    section, section
                )));
            }
        }

        if self.store.backend == StoreBackend::Qdrant
            && (self.store.url.trim().is_empty() || self.store.collection.trim().is_empty())
        {
            return Err(RagError::Config(
                "store.url and store.collection are required for qdrant".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RagError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| RagError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| RagError::Config(format!("Failed to serialize config: {}", e)))
    }
}
