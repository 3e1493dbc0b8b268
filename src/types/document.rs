//! Document types shared by the store, the rerankers and the answering step

use serde::{Deserialize, Serialize};

/// Store-assigned document identity (always positive)
pub type DocumentId = u64;

/// A stored document, or a nearest-neighbour hit when `distance` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub content: String,
    /// Present on lookups by id; search results leave it empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
    /// Present only on search results. Smaller is more similar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl Document {
    /// Build a search hit
    pub fn hit(id: DocumentId, content: impl Into<String>, distance: f64) -> Self {
        Self {
            id,
            content: content.into(),
            embedding: Vec::new(),
            distance: Some(distance),
        }
    }

    /// Similarity derived from the store distance (`1 - distance`).
    ///
    /// A document without a distance counts as maximally distant.
    pub fn similarity(&self) -> f64 {
        1.0 - self.distance.unwrap_or(1.0)
    }
}

/// A reranked candidate. Lives for one pipeline invocation only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDocument {
    /// Position in the candidate list the score refers to, not the stored id
    pub index: usize,
    pub content: String,
    pub score: f64,
}
