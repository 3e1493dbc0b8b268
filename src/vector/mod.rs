//! Vector store contract and implementations
//!
//! The store owns persisted documents. Callers only see the query contract:
//! insert, nearest-neighbour search, lookup, delete and count. Vectors of the
//! wrong dimensionality are rejected before any store work happens.

pub mod memory;
pub mod qdrant;

use async_trait::async_trait;

use crate::errors::{RagError, Result};
use crate::types::{Document, DocumentId};

pub use memory::MemoryStore;
pub use qdrant::QdrantStore;

/// Persistent document store with nearest-neighbour search
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Fixed embedding dimensionality of this store
    fn dimension(&self) -> usize;

    /// Store `content` with its embedding and return the assigned id
    async fn insert(&self, content: &str, embedding: &[f32]) -> Result<DocumentId>;

    /// The `k` nearest documents, ascending by distance. Always a fresh read.
    async fn search_nearest(&self, vector: &[f32], k: usize) -> Result<Vec<Document>>;

    /// Fetch one document including its embedding
    async fn get_by_id(&self, id: DocumentId) -> Result<Document>;

    /// Remove one document; `NotFound` when absent
    async fn delete(&self, id: DocumentId) -> Result<()>;

    /// Number of stored documents
    async fn count(&self) -> Result<u64>;
}

/// Reject a vector whose length differs from the store dimensionality
pub fn check_dimension(expected: usize, vector: &[f32]) -> Result<()> {
    if vector.len() != expected {
        return Err(RagError::DimensionMismatch {
            expected,
            actual: vector.len(),
        });
    }
    Ok(())
}
