//! Error types for ragbuddy
//!
//! Every failure carries enough context (collaborator name, status, body,
//! raw model output, document id) to be diagnosed without reading logs.

use thiserror::Error;

use crate::types::DocumentId;

/// Main error type for the retrieval-augmented answering pipeline
#[derive(Error, Debug)]
pub enum RagError {
    /// Embedding or query vector of the wrong length. Raised before any I/O.
    #[error("Dimension mismatch: expected {expected} dimensions, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// HTTP collaborator answered with a non-success status
    #[error("{service} returned status {status}: {body}")]
    Collaborator {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// HTTP collaborator unreachable or its body unreadable
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Scoring output did not satisfy the JSON contract
    #[error("Rerank contract violation: {reason}, response was: {raw}")]
    ContractViolation { reason: String, raw: String },

    /// Lookup or delete of a document that does not exist
    #[error("Document {id} not found")]
    NotFound { id: DocumentId },

    /// Vector store failure
    #[error("Vector store error: {0}")]
    Store(String),

    /// Request cancelled while a stage was waiting on I/O
    #[error("Request cancelled during {stage}")]
    Cancelled { stage: &'static str },

    /// Request deadline passed while a stage was waiting on I/O
    #[error("Request deadline of {timeout_ms}ms exceeded during {stage}")]
    DeadlineExceeded {
        stage: &'static str,
        timeout_ms: u64,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RagError {
    /// Short machine-readable code, used by the HTTP boundary
    pub fn code(&self) -> &'static str {
        match self {
            RagError::DimensionMismatch { .. } => "dimension_mismatch",
            RagError::Collaborator { .. } => "collaborator_error",
            RagError::Transport { .. } => "transport_error",
            RagError::ContractViolation { .. } => "contract_violation",
            RagError::NotFound { .. } => "not_found",
            RagError::Store(_) => "store_error",
            RagError::Cancelled { .. } => "cancelled",
            RagError::DeadlineExceeded { .. } => "deadline_exceeded",
            RagError::Config(_) => "config_error",
            RagError::Serialization(_) => "serialization_error",
            RagError::Io(_) => "io_error",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RagError::NotFound { .. })
    }
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, RagError>;
