//! HTTP rendering of pipeline errors
//!
//! Every failure becomes `{"error": {"code", "message"}}` with a status
//! chosen by where the failure came from.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::RagError;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Rag(#[from] RagError),
}

/// Error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorDetail {
    pub fn from_rag(error: &RagError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

/// Status for a pipeline error
pub fn status_for(error: &RagError) -> StatusCode {
    match error {
        RagError::NotFound { .. } => StatusCode::NOT_FOUND,
        // Caused by what a collaborator sent back (or failed to)
        RagError::Collaborator { .. }
        | RagError::Transport { .. }
        | RagError::ContractViolation { .. }
        | RagError::DimensionMismatch { .. } => StatusCode::BAD_GATEWAY,
        RagError::DeadlineExceeded { .. } => StatusCode::GATEWAY_TIMEOUT,
        RagError::Cancelled { .. } => StatusCode::SERVICE_UNAVAILABLE,
        RagError::Store(_)
        | RagError::Config(_)
        | RagError::Serialization(_)
        | RagError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Rag(error) => status_for(error),
        }
    }

    fn detail(&self) -> ErrorDetail {
        match self {
            ApiError::BadRequest(message) => ErrorDetail {
                code: "bad_request".to_string(),
                message: message.clone(),
            },
            ApiError::Rag(error) => ErrorDetail::from_rag(error),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }

        let body = ErrorResponse {
            error: self.detail(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
