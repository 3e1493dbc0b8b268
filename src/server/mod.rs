//! HTTP service boundary
//!
//! Routes:
//! - `POST   /api/v1/documents`        insert one document
//! - `POST   /api/v1/documents/all`    insert a batch, sequentially
//! - `GET    /api/v1/documents/stats`  document count
//! - `POST   /api/v1/documents/chat`   answer a question
//! - `GET    /api/v1/documents/{id}`   fetch one document
//! - `DELETE /api/v1/documents/{id}`   delete one document
//! - `GET    /health`

pub mod error;
pub mod handlers;
pub mod schema;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use crate::errors::{RagError, Result};
use crate::rag::RagPipeline;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RagPipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<RagPipeline>) -> Self {
        Self { pipeline }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/v1/documents", post(handlers::insert_document))
        .route("/api/v1/documents/all", post(handlers::insert_documents))
        .route("/api/v1/documents/stats", get(handlers::stats))
        .route("/api/v1/documents/chat", post(handlers::chat))
        .route(
            "/api/v1/documents/{id}",
            get(handlers::get_document).delete(handlers::delete_document),
        )
        .with_state(state)
}

/// Serve on `bind_addr` until Ctrl-C
pub async fn serve(bind_addr: &str, pipeline: Arc<RagPipeline>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(%local_addr, reranker = pipeline.reranker_name(), "listening");

    axum::serve(listener, router(AppState::new(pipeline)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(RagError::Io)?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
