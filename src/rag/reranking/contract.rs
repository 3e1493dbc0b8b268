//! The scoring model's output contract
//!
//! The model is asked for exactly `{"results":[{"index":i,"score":s},...]}`
//! and nothing else. Generative models still wrap that object in quotes,
//! pad it with whitespace, or emit it as a JSON-encoded string. Normalization
//! undoes those wrappers and nothing more; anything else is a contract
//! violation carrying the raw text.

use serde::Deserialize;

use crate::errors::{RagError, Result};

/// Characters stripped from both ends after whitespace
pub const WRAPPER_QUOTES: &[char] = &['"', '\'', '`'];

/// One scored entry as the model reported it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoreEntry {
    /// Position in the prompt's document list. Signed so that negative
    /// indices parse and can be reported instead of failing opaquely.
    pub index: i64,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
struct ScoreSheet {
    results: Vec<ScoreEntry>,
}

/// Strip the wrappers a model may put around the JSON object.
///
/// Whitespace is trimmed first. If what remains is itself a JSON string
/// literal, it is decoded once (double-encoded output). Finally surrounding
/// quote characters are trimmed.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();

    let unwrapped = if trimmed.starts_with('"') {
        match serde_json::from_str::<String>(trimmed) {
            Ok(inner) => inner.trim().to_string(),
            Err(_) => trimmed.to_string(),
        }
    } else {
        trimmed.to_string()
    };

    unwrapped.trim_matches(WRAPPER_QUOTES).to_string()
}

/// Normalize `raw` and parse it into score entries, in response order
pub fn parse_scores(raw: &str) -> Result<Vec<ScoreEntry>> {
    let cleaned = normalize(raw);

    serde_json::from_str::<ScoreSheet>(&cleaned)
        .map(|sheet| sheet.results)
        .map_err(|e| RagError::ContractViolation {
            reason: format!("failed to parse rerank result: {}", e),
            raw: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"results":[{"index":0,"score":0.9},{"index":1,"score":0.4}]}"#;

    fn entries() -> Vec<ScoreEntry> {
        vec![
            ScoreEntry {
                index: 0,
                score: 0.9,
            },
            ScoreEntry {
                index: 1,
                score: 0.4,
            },
        ]
    }

    #[test]
    fn test_plain_json() {
        assert_eq!(parse_scores(VALID).unwrap(), entries());
    }

    #[test]
    fn test_whitespace_and_quote_wrappers() {
        let wrapped = format!("\n  '{}'  \n", VALID);
        assert_eq!(parse_scores(&wrapped).unwrap(), entries());

        let backticks = format!("`{}`", VALID);
        assert_eq!(parse_scores(&backticks).unwrap(), entries());
    }

    #[test]
    fn test_double_encoded_json() {
        let encoded = serde_json::to_string(VALID).unwrap();
        assert!(encoded.starts_with('"'));
        assert_eq!(parse_scores(&encoded).unwrap(), entries());
    }

    #[test]
    fn test_normalize_leaves_bare_object_alone() {
        assert_eq!(normalize(VALID), VALID);
        assert_eq!(normalize("  \"{}\" "), "{}");
    }

    #[test]
    fn test_prose_is_violation() {
        let raw = "Sure! Here are the scores: {\"results\":[]}";
        match parse_scores(raw) {
            Err(RagError::ContractViolation { raw: attached, .. }) => assert_eq!(attached, raw),
            other => panic!("expected contract violation, got {:?}", other),
        }
    }

    #[test]
    fn test_markdown_fence_is_violation() {
        let fenced = format!("```json\n{}\n```", VALID);
        assert!(matches!(
            parse_scores(&fenced),
            Err(RagError::ContractViolation { .. })
        ));
    }

    #[test]
    fn test_missing_results_key_is_violation() {
        assert!(parse_scores(r#"{"scores":[{"index":0,"score":0.9}]}"#).is_err());
        assert!(parse_scores("").is_err());
        assert!(parse_scores(r#"{"results":[{"index":0}]}"#).is_err());
    }

    #[test]
    fn test_empty_results_is_valid() {
        assert!(parse_scores(r#"{"results":[]}"#).unwrap().is_empty());
    }
}
