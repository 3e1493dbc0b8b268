// Retrieval-augmented answering
//
// Components, leaves first:
// - Retrieval: nearest-neighbour search over the vector store
// - Reranking: model-based scoring with a strict JSON contract, or the
//   deterministic fallback scorer
// - Context: grounding instruction assembled from the reranked documents
// - Pipeline: embed -> search -> rerank -> answer, under a request scope

pub mod answer;
pub mod context;
pub mod pipeline;
pub mod reranking;
pub mod retrieval;
pub mod scope;

pub use answer::Answerer;
pub use context::ContextBuilder;
pub use pipeline::{Answer, BatchReport, ItemOutcome, RagPipeline};
pub use reranking::{FallbackReranker, ModelReranker, Reranker};
pub use retrieval::SimilaritySearch;
pub use scope::{CancelHandle, RequestScope};
