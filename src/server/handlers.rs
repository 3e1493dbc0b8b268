// Route handlers. Each request gets its own scope from the pipeline.
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::server::error::{ApiError, ApiResult};
use crate::server::schema::{
    BatchInsertRequest, BatchInsertResponse, ChatRequest, ChatResponse, DeleteResponse,
    HealthResponse, InsertRequest, InsertResponse, StatsResponse,
};
use crate::server::AppState;
use crate::types::{Document, DocumentId};

fn require_content(content: &str, field: &str) -> ApiResult<()> {
    if content.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// POST /api/v1/documents
pub async fn insert_document(
    State(state): State<AppState>,
    payload: Result<Json<InsertRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<InsertResponse>)> {
    let Json(request) = payload?;
    require_content(&request.content, "content")?;

    let id = state
        .pipeline
        .ingest(&request.content, &state.pipeline.scope())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(InsertResponse {
            id,
            message: "Document inserted successfully".to_string(),
        }),
    ))
}

/// POST /api/v1/documents/all
///
/// 201 when every item was inserted, 207 with the per-item report otherwise.
pub async fn insert_documents(
    State(state): State<AppState>,
    payload: Result<Json<BatchInsertRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<BatchInsertResponse>)> {
    let Json(request) = payload?;
    if request.content.is_empty() {
        return Err(ApiError::BadRequest("content must not be empty".to_string()));
    }
    for (index, content) in request.content.iter().enumerate() {
        require_content(content, &format!("content[{}]", index))?;
    }

    let report = state
        .pipeline
        .ingest_batch(&request.content, &state.pipeline.scope())
        .await;

    let status = if report.is_complete() {
        StatusCode::CREATED
    } else {
        StatusCode::MULTI_STATUS
    };
    Ok((status, Json(BatchInsertResponse::from(&report))))
}

/// GET /api/v1/documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    id: Result<Path<DocumentId>, PathRejection>,
) -> ApiResult<Json<Document>> {
    let Path(id) = id?;
    let document = state.pipeline.get(id, &state.pipeline.scope()).await?;
    Ok(Json(document))
}

/// DELETE /api/v1/documents/{id}
pub async fn delete_document(
    State(state): State<AppState>,
    id: Result<Path<DocumentId>, PathRejection>,
) -> ApiResult<Json<DeleteResponse>> {
    let Path(id) = id?;
    state.pipeline.delete(id, &state.pipeline.scope()).await?;
    Ok(Json(DeleteResponse {
        id,
        message: "Document deleted successfully".to_string(),
    }))
}

/// GET /api/v1/documents/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let total_documents = state.pipeline.count(&state.pipeline.scope()).await?;
    Ok(Json(StatsResponse { total_documents }))
}

/// POST /api/v1/documents/chat
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(request) = payload?;
    require_content(&request.content, "content")?;

    let answer = state
        .pipeline
        .ask(&request.content, &state.pipeline.scope())
        .await?;
    Ok(Json(ChatResponse {
        answer: answer.answer,
    }))
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
