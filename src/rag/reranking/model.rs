//! Model-based reranker
//!
//! Shows at most the first three candidates (content cut to 200 characters)
//! to a generative scoring model, parses its JSON reply and keeps entries
//! scoring above 0.6. Survivors come back in the order the model listed
//! them; nothing is re-sorted.
//!
//! Indices in the reply are resolved against the candidates that were
//! actually shown. An index outside that range is a contract violation.

use async_trait::async_trait;
use std::fmt::Write;
use std::sync::Arc;

use crate::collaborators::TextGenerator;
use crate::errors::{RagError, Result};
use crate::rag::reranking::contract::parse_scores;
use crate::rag::reranking::Reranker;
use crate::types::{Document, RankedDocument};

/// Candidates shown to the scoring model
pub const MAX_PROMPT_DOCUMENTS: usize = 3;

/// Per-document content limit in the prompt, in characters
pub const MAX_DOCUMENT_CHARS: usize = 200;

/// Scores must be strictly greater than this to be kept
pub const RELEVANCE_THRESHOLD: f64 = 0.6;

/// Reranker backed by a generative scoring collaborator
pub struct ModelReranker {
    generator: Arc<dyn TextGenerator>,
}

impl ModelReranker {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Reranker for ModelReranker {
    fn name(&self) -> &'static str {
        "model"
    }

    async fn rerank(&self, query: &str, candidates: &[Document]) -> Result<Vec<RankedDocument>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let shown = &candidates[..candidates.len().min(MAX_PROMPT_DOCUMENTS)];
        let prompt = build_prompt(query, shown);

        let raw = self.generator.generate("", &prompt).await?;
        tracing::debug!(raw = %raw, "scoring model replied");

        let entries = parse_scores(&raw).map_err(|e| {
            tracing::warn!(error = %e, "scoring output violated the contract");
            e
        })?;

        let mut kept = Vec::new();
        for entry in entries {
            let index = resolve_index(entry.index, shown.len(), &raw)?;
            if entry.score > RELEVANCE_THRESHOLD {
                kept.push(RankedDocument {
                    index,
                    content: shown[index].content.clone(),
                    score: entry.score,
                });
            }
        }

        tracing::debug!(shown = shown.len(), kept = kept.len(), "model rerank complete");
        Ok(kept)
    }
}

fn resolve_index(index: i64, shown: usize, raw: &str) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|i| *i < shown)
        .ok_or_else(|| RagError::ContractViolation {
            reason: format!(
                "index {} outside the {} documents shown to the model",
                index, shown
            ),
            raw: raw.to_string(),
        })
}

/// Cut `content` to at most `max_chars` characters
fn truncate_chars(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &content[..byte_index],
        None => content,
    }
}

/// Build the scoring instruction for the documents actually shown
pub fn build_prompt(query: &str, shown: &[Document]) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are a reranking system.\n");
    prompt.push_str("Score each document for relevance to the query.\n\n");

    prompt.push_str("RULES:\n");
    prompt.push_str("OUTPUT ONLY VALID JSON. NO EXTRA TEXT.\n\n");
    prompt.push_str("- No markdown, no code fences, no explanations\n");
    let _ = writeln!(prompt, "- Exactly {} results, one per document", shown.len());
    prompt.push_str("- Score range: 0.0 to 1.0\n");
    prompt.push_str("- Consider both semantic relevance AND vector similarity\n");
    prompt.push_str("- Start with { and end with }\n\n");

    prompt.push_str("Query:\n");
    prompt.push_str(query);
    prompt.push_str("\n\n");

    prompt.push_str("Documents:\n");
    for (i, doc) in shown.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "D{} (similarity: {:.3}): {}",
            i,
            doc.similarity(),
            truncate_chars(&doc.content, MAX_DOCUMENT_CHARS)
        );
    }

    prompt.push_str("\nOutput JSON format:\n");
    prompt.push_str(r#"{"results":["#);
    for i in 0..shown.len() {
        if i > 0 {
            prompt.push(',');
        }
        let _ = write!(prompt, r#"{{"index":{},"score":0.0}}"#, i);
    }
    prompt.push_str("]}");

    prompt
}
