//! Interfaces to the external collaborators the pipeline depends on
//!
//! Each component holds only the handles it needs, injected at construction.

use async_trait::async_trait;

use crate::errors::Result;

/// Turns text into a fixed-length vector
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Freeform text generation from a system instruction and user text.
///
/// No structural guarantee on the output; callers enforce their own contract.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, user: &str) -> Result<String>;
}
