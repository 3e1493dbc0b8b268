// Request and response bodies of the HTTP API
use serde::{Deserialize, Serialize};

use crate::rag::{BatchReport, ItemOutcome};
use crate::server::error::ErrorDetail;
use crate::types::DocumentId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertResponse {
    pub id: DocumentId,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchInsertRequest {
    pub content: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Inserted,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    /// 0-based position in the request's `content` array
    pub index: usize,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchInsertResponse {
    pub message: String,
    pub inserted: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_index: Option<usize>,
    pub items: Vec<BatchItem>,
}

impl From<&BatchReport> for BatchInsertResponse {
    fn from(report: &BatchReport) -> Self {
        let items: Vec<BatchItem> = report
            .items
            .iter()
            .enumerate()
            .map(|(index, outcome)| match outcome {
                ItemOutcome::Inserted { id } => BatchItem {
                    index,
                    status: ItemStatus::Inserted,
                    id: Some(*id),
                    error: None,
                },
                ItemOutcome::Failed { error } => BatchItem {
                    index,
                    status: ItemStatus::Failed,
                    id: None,
                    error: Some(ErrorDetail::from_rag(error)),
                },
                ItemOutcome::Skipped => BatchItem {
                    index,
                    status: ItemStatus::Skipped,
                    id: None,
                    error: None,
                },
            })
            .collect();

        let inserted = report.inserted_ids().len();
        let failed_index = report.failure().map(|(index, _)| index);
        let message = match failed_index {
            None => "Documents inserted successfully".to_string(),
            Some(index) => format!(
                "Batch stopped at item {}: {} of {} documents inserted",
                index,
                inserted,
                items.len()
            ),
        };

        Self {
            message,
            inserted,
            failed_index,
            items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub id: DocumentId,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_documents: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
