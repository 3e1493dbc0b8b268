//! Type definitions module
//!
//! Persisted documents and the request-scoped ranked view produced by rerankers.

pub mod document;

// Re-export commonly used types
pub use document::{Document, DocumentId, RankedDocument};
