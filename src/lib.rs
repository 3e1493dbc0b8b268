//! ragbuddy - retrieval-augmented answering over a vector store
//!
//! # Architecture
//!
//! - **vector**: store contract with in-memory and Qdrant backends
//! - **ollama**: embedding, scoring and chat collaborators over HTTP
//! - **rag**: similarity search, reranking, grounding context, orchestration
//! - **server**: axum HTTP API over the pipeline
//! - **cli**: command-line interface

pub mod cli;
pub mod collaborators;
pub mod config;
pub mod errors;
pub mod ollama;
pub mod rag;
pub mod server;
pub mod types;
pub mod vector;

// Re-export commonly used types
pub use errors::{RagError, Result};
