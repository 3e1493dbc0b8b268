// Grounding context: turns reranked evidence into the answering instruction
use std::fmt::Write;

use crate::types::RankedDocument;

/// Note used when reranking left nothing to ground on
pub const NO_REFERENCE_NOTE: &str = "There are no reference documents for this question.";

/// Builds the system instruction handed to the answering model.
///
/// Every document passed in is included with its full content; bounding how
/// many documents arrive here is the reranker's job.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextBuilder;

impl ContextBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, documents: &[RankedDocument]) -> String {
        let mut instruction = String::new();

        instruction.push_str(
            "You are an assistant that answers questions by combining all of the reference documents provided.\n\n",
        );
        instruction.push_str("Important rules:\n");
        instruction.push_str(
            "1. Synthesize every reference document into one or two natural sentences.\n",
        );
        instruction.push_str("2. Keep the answer concise and friendly, with only the information needed.\n");
        instruction.push_str(
            "3. If the documents do not contain the information, politely say that you do not know.\n\n",
        );

        if documents.is_empty() {
            instruction.push_str(NO_REFERENCE_NOTE);
            instruction.push('\n');
            return instruction;
        }

        let _ = writeln!(
            instruction,
            "=== Reference documents ({} total) ===",
            documents.len()
        );
        for (i, doc) in documents.iter().enumerate() {
            let _ = writeln!(instruction, "\n[Document {}] (relevance: {:.2})", i + 1, doc.score);
            instruction.push_str(&doc.content);
            instruction.push('\n');
        }
        instruction.push_str("\n=== Review every document above and answer from all of them ===\n");

        instruction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(index: usize, content: &str, score: f64) -> RankedDocument {
        RankedDocument {
            index,
            content: content.to_string(),
            score,
        }
    }

    #[test]
    fn test_empty_documents_note_absence() {
        let instruction = ContextBuilder::new().build(&[]);
        assert!(!instruction.is_empty());
        assert!(instruction.contains(NO_REFERENCE_NOTE));
        assert!(instruction.contains("politely"));
        assert!(!instruction.contains("[Document"));
    }

    #[test]
    fn test_documents_listed_with_scores() {
        let docs = vec![
            ranked(0, "한국의 수도는 서울입니다.", 0.95),
            ranked(2, "서울은 한강을 끼고 있다.", 0.7),
        ];
        let instruction = ContextBuilder::new().build(&docs);

        assert!(instruction.contains("(2 total)"));
        assert!(instruction.contains("[Document 1] (relevance: 0.95)\n한국의 수도는 서울입니다.\n"));
        assert!(instruction.contains("[Document 2] (relevance: 0.70)\n서울은 한강을 끼고 있다.\n"));
        assert!(!instruction.contains(NO_REFERENCE_NOTE));
    }

    #[test]
    fn test_full_content_is_kept() {
        let long = "문".repeat(5000);
        let instruction = ContextBuilder::new().build(&[ranked(0, &long, 0.9)]);
        assert!(instruction.contains(&long));
    }
}
