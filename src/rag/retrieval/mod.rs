// Nearest-neighbour retrieval over the vector store
pub mod engine;

pub use engine::SimilaritySearch;
