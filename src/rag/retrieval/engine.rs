// Similarity search: the retrieval step of the pipeline
use std::sync::Arc;

use crate::errors::Result;
use crate::types::Document;
use crate::vector::{check_dimension, VectorStore};

/// Nearest-neighbour search against the shared vector store
#[derive(Clone)]
pub struct SimilaritySearch {
    store: Arc<dyn VectorStore>,
}

impl SimilaritySearch {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    /// The `k` nearest stored documents, nearest first.
    ///
    /// A query vector of the wrong length is rejected here, so the store never
    /// sees it. Store failures are returned as-is and never retried.
    pub async fn search(&self, query_vector: &[f32], k: usize) -> Result<Vec<Document>> {
        check_dimension(self.store.dimension(), query_vector)?;

        let documents = self.store.search_nearest(query_vector, k).await?;
        tracing::debug!(k, hits = documents.len(), "similarity search complete");
        Ok(documents)
    }
}
