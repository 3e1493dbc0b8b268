// Answering step: grounded generation over the reranked documents
use std::sync::Arc;

use crate::collaborators::TextGenerator;
use crate::errors::Result;
use crate::rag::context::ContextBuilder;
use crate::types::RankedDocument;

/// Asks the answering collaborator for a reply grounded in `documents`
pub struct Answerer {
    generator: Arc<dyn TextGenerator>,
    context: ContextBuilder,
}

impl Answerer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            context: ContextBuilder::new(),
        }
    }

    pub async fn answer(&self, question: &str, documents: &[RankedDocument]) -> Result<String> {
        let instruction = self.context.build(documents);
        tracing::debug!(
            documents = documents.len(),
            instruction_chars = instruction.chars().count(),
            "requesting grounded answer"
        );
        self.generator.generate(&instruction, question).await
    }
}
