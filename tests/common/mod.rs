//! Scripted collaborators and a spy store shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use ragbuddy::collaborators::{Embedder, TextGenerator};
use ragbuddy::types::{Document, DocumentId};
use ragbuddy::vector::VectorStore;
use ragbuddy::{RagError, Result};

/// Returns a fixed vector per text (or a default), failing on texts that
/// contain `fail_marker`
pub struct ScriptedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    default: Vec<f32>,
    fail_marker: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedEmbedder {
    pub fn constant(vector: Vec<f32>) -> Self {
        Self {
            vectors: HashMap::new(),
            default: vector,
            fail_marker: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn failing_on(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for ScriptedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(marker) = &self.fail_marker {
            if text.contains(marker.as_str()) {
                return Err(RagError::Collaborator {
                    service: "embedding",
                    status: 500,
                    body: format!("cannot embed {:?}", text),
                });
            }
        }

        Ok(self
            .vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.default.clone()))
    }
}

/// Replies with fixed text after an optional delay and records every call
pub struct ScriptedGenerator {
    reply: String,
    delay: Option<Duration>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Takes `delay` before replying
    pub fn slow(reply: &str, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::replying(reply)
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.reply.clone())
    }
}

/// Store returning preset search hits and counting every call
pub struct SpyStore {
    dimension: usize,
    hits: Vec<Document>,
    pub inserts: AtomicUsize,
    pub searches: AtomicUsize,
}

impl SpyStore {
    pub fn new(dimension: usize, hits: Vec<Document>) -> Self {
        Self {
            dimension,
            hits,
            inserts: AtomicUsize::new(0),
            searches: AtomicUsize::new(0),
        }
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorStore for SpyStore {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn insert(&self, _content: &str, _embedding: &[f32]) -> Result<DocumentId> {
        Ok(self.inserts.fetch_add(1, Ordering::SeqCst) as DocumentId + 1)
    }

    async fn search_nearest(&self, _vector: &[f32], k: usize) -> Result<Vec<Document>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        Ok(self.hits.iter().take(k).cloned().collect())
    }

    async fn get_by_id(&self, id: DocumentId) -> Result<Document> {
        self.hits
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or(RagError::NotFound { id })
    }

    async fn delete(&self, id: DocumentId) -> Result<()> {
        Err(RagError::NotFound { id })
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.hits.len() as u64)
    }
}

/// The three documents of the Korean capital scenario, nearest first
pub fn capital_hits() -> Vec<Document> {
    vec![
        Document::hit(1, "한국의 수도는 서울입니다.", 0.1),
        Document::hit(2, "한국의 수도는 서울이다.", 0.12),
        Document::hit(3, "테스트입니다.", 0.9),
    ]
}

pub const CAPITAL_QUESTION: &str = "한국의 수도는 어딜까?";
