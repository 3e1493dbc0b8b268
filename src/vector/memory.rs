//! In-process vector store with cosine distance
//!
//! Used for tests, demos and the `memory` backend. Contents vanish with the
//! process.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::errors::{RagError, Result};
use crate::types::{Document, DocumentId};
use crate::vector::{check_dimension, VectorStore};

#[derive(Debug, Clone)]
struct StoredEntry {
    content: String,
    embedding: Vec<f32>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<DocumentId, StoredEntry>,
    last_id: DocumentId,
}

/// Vector store held entirely in memory
#[derive(Debug)]
pub struct MemoryStore {
    dimension: usize,
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            inner: RwLock::new(Inner::default()),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| RagError::Store("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| RagError::Store("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn insert(&self, content: &str, embedding: &[f32]) -> Result<DocumentId> {
        check_dimension(self.dimension, embedding)?;

        let mut inner = self.write()?;
        inner.last_id += 1;
        let id = inner.last_id;
        inner.entries.insert(
            id,
            StoredEntry {
                content: content.to_string(),
                embedding: embedding.to_vec(),
            },
        );
        Ok(id)
    }

    async fn search_nearest(&self, vector: &[f32], k: usize) -> Result<Vec<Document>> {
        check_dimension(self.dimension, vector)?;

        let inner = self.read()?;
        let mut scored: Vec<(f64, DocumentId, &StoredEntry)> = inner
            .entries
            .iter()
            .map(|(id, entry)| (cosine_distance(vector, &entry.embedding), *id, entry))
            .collect();

        // Ascending by distance, ties broken by id
        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(distance, id, entry)| Document::hit(id, entry.content.clone(), distance))
            .collect())
    }

    async fn get_by_id(&self, id: DocumentId) -> Result<Document> {
        let inner = self.read()?;
        let entry = inner.entries.get(&id).ok_or(RagError::NotFound { id })?;
        Ok(Document {
            id,
            content: entry.content.clone(),
            embedding: entry.embedding.clone(),
            distance: None,
        })
    }

    async fn delete(&self, id: DocumentId) -> Result<()> {
        let mut inner = self.write()?;
        inner
            .entries
            .remove(&id)
            .map(|_| ())
            .ok_or(RagError::NotFound { id })
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.read()?.entries.len() as u64)
    }
}

/// `1 - cosine similarity`; zero vectors are maximally unrelated (distance 1)
fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 1.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        1.0
    } else {
        1.0 - dot / denom
    }
}
