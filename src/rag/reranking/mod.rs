//! Second-pass relevance scoring of retrieval candidates
//!
//! Two interchangeable strategies sit behind [`Reranker`]:
//! - [`ModelReranker`] asks a generative model for scores under a strict JSON
//!   contract and keeps candidates above the relevance threshold
//! - [`FallbackReranker`] blends vector similarity, keyword overlap and a
//!   length heuristic without any I/O
//!
//! The orchestrator picks one from configuration. A failing model reranker
//! is never silently replaced by the fallback.

pub mod contract;
pub mod model;
pub mod scorer;

use async_trait::async_trait;

use crate::errors::Result;
use crate::types::{Document, RankedDocument};

pub use model::ModelReranker;
pub use scorer::FallbackReranker;

/// Re-scores search hits for one query
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Score `candidates` (nearest first, as returned by search) against `query`
    async fn rerank(&self, query: &str, candidates: &[Document]) -> Result<Vec<RankedDocument>>;
}
