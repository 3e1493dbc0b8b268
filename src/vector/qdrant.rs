//! Qdrant-backed vector store
//!
//! One collection with cosine distance. Qdrant reports cosine *similarity*
//! as the score, so hits carry `distance = 1 - score`. Document content lives
//! in the `content` payload key.

use async_trait::async_trait;
use qdrant_client::qdrant::{
    point_id::PointIdOptions, value::Kind, vectors::VectorsOptions, CountPointsBuilder,
    CreateCollectionBuilder, DeletePointsBuilder, Distance, GetPointsBuilder, PointId,
    PointStruct, PointsIdsList, SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue,
    VectorParamsBuilder, Vectors,
};
use qdrant_client::Qdrant;
use std::collections::HashMap;
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::errors::{RagError, Result};
use crate::types::{Document, DocumentId};
use crate::vector::{check_dimension, VectorStore};

const CONTENT_KEY: &str = "content";

/// Vector store over a Qdrant collection
pub struct QdrantStore {
    client: Qdrant,
    collection: String,
    dimension: usize,
}

impl QdrantStore {
    /// Connect and make sure the collection exists
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let client = Qdrant::from_url(&config.url)
            .build()
            .map_err(|e| store_error("Failed to create Qdrant client", e))?;

        let store = Self {
            client,
            collection: config.collection.clone(),
            dimension: config.dimension,
        };
        store.ensure_collection().await?;

        tracing::info!(
            collection = %store.collection,
            dimension = store.dimension,
            "qdrant store ready"
        );
        Ok(store)
    }

    async fn ensure_collection(&self) -> Result<()> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| store_error("Failed to list collections", e))?;

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection).vectors_config(
                        VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine),
                    ),
                )
                .await
                .map_err(|e| store_error("Failed to create collection", e))?;
        }

        Ok(())
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn insert(&self, content: &str, embedding: &[f32]) -> Result<DocumentId> {
        check_dimension(self.dimension, embedding)?;

        let id = allocate_id();
        let mut payload: HashMap<String, QdrantValue> = HashMap::new();
        payload.insert(CONTENT_KEY.to_string(), QdrantValue::from(content.to_string()));

        let point = PointStruct::new(id, embedding.to_vec(), payload);

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]).wait(true))
            .await
            .map_err(|e| store_error("Failed to insert document", e))?;

        Ok(id)
    }

    async fn search_nearest(&self, vector: &[f32], k: usize) -> Result<Vec<Document>> {
        check_dimension(self.dimension, vector)?;

        if k == 0 {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector.to_vec(), k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| store_error("Failed to search", e))?;

        let mut documents: Vec<Document> = response
            .result
            .into_iter()
            .map(|point| {
                Document::hit(
                    point_id_to_u64(&point.id),
                    payload_content(&point.payload),
                    1.0 - point.score as f64,
                )
            })
            .collect();

        // Qdrant already orders by score; keep the ascending-distance contract explicit
        documents.sort_by(|a, b| {
            a.distance
                .unwrap_or(1.0)
                .total_cmp(&b.distance.unwrap_or(1.0))
        });

        Ok(documents)
    }

    async fn get_by_id(&self, id: DocumentId) -> Result<Document> {
        let response = self
            .client
            .get_points(
                GetPointsBuilder::new(&self.collection, vec![PointId::from(id)])
                    .with_payload(true)
                    .with_vectors(true),
            )
            .await
            .map_err(|e| store_error("Failed to get document", e))?;

        let point = response
            .result
            .into_iter()
            .next()
            .ok_or(RagError::NotFound { id })?;

        Ok(Document {
            id,
            content: payload_content(&point.payload),
            embedding: dense_vector(point.vectors),
            distance: None,
        })
    }

    async fn delete(&self, id: DocumentId) -> Result<()> {
        // Qdrant does not report affected points, so look first
        self.get_by_id(id).await?;

        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection)
                    .points(PointsIdsList {
                        ids: vec![PointId::from(id)],
                    })
                    .wait(true),
            )
            .await
            .map_err(|e| store_error("Failed to delete document", e))?;

        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let response = self
            .client
            .count(CountPointsBuilder::new(&self.collection).exact(true))
            .await
            .map_err(|e| store_error("Failed to count documents", e))?;

        Ok(response.result.map(|r| r.count).unwrap_or(0))
    }
}

/// Positive 63-bit id drawn from a random UUID
fn allocate_id() -> DocumentId {
    let id = (Uuid::new_v4().as_u128() as u64) >> 1;
    id.max(1)
}

fn store_error(context: &str, err: impl std::fmt::Display) -> RagError {
    RagError::Store(format!("{}: {}", context, err))
}

fn payload_content(payload: &HashMap<String, QdrantValue>) -> String {
    payload
        .get(CONTENT_KEY)
        .and_then(|value| match &value.kind {
            Some(Kind::StringValue(s)) => Some(s.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

fn point_id_to_u64(point_id: &Option<PointId>) -> DocumentId {
    match point_id.as_ref().and_then(|id| id.point_id_options.as_ref()) {
        Some(PointIdOptions::Num(n)) => *n,
        _ => 0,
    }
}

fn dense_vector(vectors: Option<Vectors>) -> Vec<f32> {
    match vectors.and_then(|v| v.vectors_options) {
        Some(VectorsOptions::Vector(vector)) => vector.data,
        _ => Vec::new(),
    }
}
