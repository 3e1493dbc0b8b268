// End-to-end pipeline: embed -> search -> rerank -> answer, plus ingestion
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::collaborators::{Embedder, TextGenerator};
use crate::config::{Config, RerankStrategy, StoreBackend};
use crate::errors::{RagError, Result};
use crate::ollama::{OllamaChat, OllamaEmbedder, OllamaGenerator};
use crate::rag::answer::Answerer;
use crate::rag::reranking::{FallbackReranker, ModelReranker, Reranker};
use crate::rag::retrieval::SimilaritySearch;
use crate::rag::scope::{stage, CancelHandle, RequestScope};
use crate::types::{Document, DocumentId, RankedDocument};
use crate::vector::{check_dimension, MemoryStore, QdrantStore, VectorStore};

/// Outcome of one question
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub answer: String,
    /// Candidates returned by similarity search
    pub documents_retrieved: usize,
    /// Candidates that survived reranking and grounded the answer
    pub documents_ranked: usize,
    pub ranked: Vec<RankedDocument>,
}

/// What happened to one item of a batch ingest
#[derive(Debug)]
pub enum ItemOutcome {
    Inserted { id: DocumentId },
    Failed { error: RagError },
    /// Never attempted because an earlier item failed
    Skipped,
}

/// Per-item report of a batch ingest. Items are in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<ItemOutcome>,
}

impl BatchReport {
    /// True when every item was inserted
    pub fn is_complete(&self) -> bool {
        self.items
            .iter()
            .all(|item| matches!(item, ItemOutcome::Inserted { .. }))
    }

    /// Ids of the items that were committed, in input order
    pub fn inserted_ids(&self) -> Vec<DocumentId> {
        self.items
            .iter()
            .filter_map(|item| match item {
                ItemOutcome::Inserted { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Index and error of the item that stopped the batch
    pub fn failure(&self) -> Option<(usize, &RagError)> {
        self.items.iter().enumerate().find_map(|(i, item)| match item {
            ItemOutcome::Failed { error } => Some((i, error)),
            _ => None,
        })
    }
}

/// Retrieval-augmented answering over one vector store.
///
/// Holds only injected handles; no state is carried between requests.
pub struct RagPipeline {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    search: SimilaritySearch,
    reranker: Arc<dyn Reranker>,
    answerer: Answerer,
    search_k: usize,
    request_timeout: Option<Duration>,
}

impl RagPipeline {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        reranker: Arc<dyn Reranker>,
        chat: Arc<dyn TextGenerator>,
        search_k: usize,
    ) -> Self {
        Self {
            embedder,
            search: SimilaritySearch::new(store.clone()),
            store,
            reranker,
            answerer: Answerer::new(chat),
            search_k,
            request_timeout: None,
        }
    }

    /// Deadline applied by [`RagPipeline::scope`]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Wire the Ollama collaborators and the configured store
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store: Arc<dyn VectorStore> = match config.store.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new(config.store.dimension)),
            StoreBackend::Qdrant => Arc::new(QdrantStore::connect(&config.store).await?),
        };

        let embedder = Arc::new(OllamaEmbedder::new(&config.embedding, &config.http)?);
        let chat = Arc::new(OllamaChat::new(&config.chat, &config.http)?);

        let reranker: Arc<dyn Reranker> = match config.reranker.strategy {
            RerankStrategy::Model => Arc::new(ModelReranker::new(Arc::new(
                OllamaGenerator::new(&config.reranker, &config.http)?,
            ))),
            RerankStrategy::Fallback => Arc::new(FallbackReranker::new()),
        };

        let timeout = match config.pipeline.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        tracing::info!(
            backend = ?config.store.backend,
            reranker = reranker.name(),
            search_k = config.pipeline.search_k,
            "pipeline ready"
        );

        Ok(Self::new(embedder, store, reranker, chat, config.pipeline.search_k)
            .with_request_timeout(timeout))
    }

    /// A fresh scope carrying the configured request deadline
    pub fn scope(&self) -> RequestScope {
        match self.request_timeout {
            Some(timeout) => RequestScope::with_timeout(timeout),
            None => RequestScope::unbounded(),
        }
    }

    /// Like [`RagPipeline::scope`], plus a handle to cancel it
    pub fn cancellable_scope(&self) -> (RequestScope, CancelHandle) {
        let (scope, handle) = RequestScope::cancellable();
        match self.request_timeout {
            Some(timeout) => (scope.deadline_in(timeout), handle),
            None => (scope, handle),
        }
    }

    pub fn reranker_name(&self) -> &'static str {
        self.reranker.name()
    }

    /// Answer `question` from the nearest stored documents.
    ///
    /// Stages run strictly in sequence; the first failing stage aborts the
    /// request with its error.
    pub async fn ask(&self, question: &str, scope: &RequestScope) -> Result<Answer> {
        let query_vector = scope.guard(stage::EMBED, self.embedder.embed(question)).await?;

        let candidates = scope
            .guard(stage::SEARCH, self.search.search(&query_vector, self.search_k))
            .await?;

        let ranked = scope
            .guard(stage::RERANK, self.reranker.rerank(question, &candidates))
            .await?;
        tracing::debug!(
            reranker = self.reranker.name(),
            candidates = candidates.len(),
            kept = ranked.len(),
            "rerank complete"
        );

        let answer = scope
            .guard(stage::ANSWER, self.answerer.answer(question, &ranked))
            .await?;

        tracing::info!(
            retrieved = candidates.len(),
            ranked = ranked.len(),
            "question answered"
        );

        Ok(Answer {
            answer,
            documents_retrieved: candidates.len(),
            documents_ranked: ranked.len(),
            ranked,
        })
    }

    /// Embed and store one document
    pub async fn ingest(&self, content: &str, scope: &RequestScope) -> Result<DocumentId> {
        let embedding = scope.guard(stage::EMBED, self.embedder.embed(content)).await?;
        check_dimension(self.store.dimension(), &embedding)?;

        let id = scope
            .guard(stage::INSERT, self.store.insert(content, &embedding))
            .await?;
        tracing::info!(id, chars = content.chars().count(), "document ingested");
        Ok(id)
    }

    /// Ingest `texts` one after another, stopping at the first failure.
    ///
    /// Items already inserted stay committed. Items after the failure are
    /// reported as skipped.
    pub async fn ingest_batch<S: AsRef<str>>(&self, texts: &[S], scope: &RequestScope) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, text) in texts.iter().enumerate() {
            match self.ingest(text.as_ref(), scope).await {
                Ok(id) => report.items.push(ItemOutcome::Inserted { id }),
                Err(error) => {
                    tracing::warn!(index, error = %error, "batch ingest stopped");
                    report.items.push(ItemOutcome::Failed { error });
                    report
                        .items
                        .extend((index + 1..texts.len()).map(|_| ItemOutcome::Skipped));
                    break;
                }
            }
        }

        report
    }

    pub async fn get(&self, id: DocumentId, scope: &RequestScope) -> Result<Document> {
        scope.guard(stage::LOOKUP, self.store.get_by_id(id)).await
    }

    pub async fn delete(&self, id: DocumentId, scope: &RequestScope) -> Result<()> {
        scope.guard(stage::LOOKUP, self.store.delete(id)).await?;
        tracing::info!(id, "document deleted");
        Ok(())
    }

    pub async fn count(&self, scope: &RequestScope) -> Result<u64> {
        scope.guard(stage::LOOKUP, self.store.count()).await
    }
}
