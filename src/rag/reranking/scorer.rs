// Deterministic reranker: vector similarity + keyword overlap + length quality
use async_trait::async_trait;

use crate::errors::Result;
use crate::rag::reranking::Reranker;
use crate::types::{Document, RankedDocument};

const VECTOR_WEIGHT: f64 = 0.5;
const KEYWORD_WEIGHT: f64 = 0.4;
const LENGTH_WEIGHT: f64 = 0.1;

/// Results kept after sorting
pub const FALLBACK_TOP_N: usize = 3;

/// Ideal content length range, in characters
const IDEAL_MIN_CHARS: usize = 50;
const IDEAL_MAX_CHARS: usize = 200;

/// Keyword score when the query has no tokens at all
const NEUTRAL_KEYWORD_SCORE: f64 = 0.5;

/// Zero-latency scorer with no external dependencies. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackReranker;

impl FallbackReranker {
    pub fn new() -> Self {
        Self
    }

    /// Score every candidate, sort descending (input order breaks ties) and
    /// keep the top three
    pub fn rank(&self, query: &str, candidates: &[Document]) -> Vec<RankedDocument> {
        let query_tokens = tokenize(query);

        let mut ranked: Vec<RankedDocument> = candidates
            .iter()
            .enumerate()
            .map(|(index, doc)| RankedDocument {
                index,
                content: doc.content.clone(),
                score: final_score(&query_tokens, doc),
            })
            .collect();

        // sort_by is stable, so equal scores keep their input order
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(FALLBACK_TOP_N);
        ranked
    }
}

#[async_trait]
impl Reranker for FallbackReranker {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn rerank(&self, query: &str, candidates: &[Document]) -> Result<Vec<RankedDocument>> {
        Ok(self.rank(query, candidates))
    }
}

fn final_score(query_tokens: &[String], doc: &Document) -> f64 {
    VECTOR_WEIGHT * doc.similarity()
        + KEYWORD_WEIGHT * keyword_score(query_tokens, &doc.content)
        + LENGTH_WEIGHT * length_score(&doc.content)
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || ('가'..='힣').contains(&c)
}

/// Lowercase, then split on anything that is not `a-z`, `0-9` or a Hangul
/// syllable. Empty pieces are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !is_token_char(c))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fraction of query tokens present in the content's token set
pub fn keyword_score(query_tokens: &[String], content: &str) -> f64 {
    if query_tokens.is_empty() {
        return NEUTRAL_KEYWORD_SCORE;
    }

    let content_tokens: std::collections::HashSet<String> = tokenize(content).into_iter().collect();
    let matched = query_tokens
        .iter()
        .filter(|token| content_tokens.contains(*token))
        .count();

    matched as f64 / query_tokens.len() as f64
}

/// Piecewise length quality over the character count. Not clamped below.
pub fn length_score(content: &str) -> f64 {
    let length = content.chars().count();

    if (IDEAL_MIN_CHARS..=IDEAL_MAX_CHARS).contains(&length) {
        1.0
    } else if length < IDEAL_MIN_CHARS {
        length as f64 / IDEAL_MIN_CHARS as f64
    } else {
        1.0 - (length - IDEAL_MAX_CHARS) as f64 / 1000.0
    }
}
