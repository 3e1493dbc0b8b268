//! HTTP API tests against a live router on an ephemeral port

mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

use common::{ScriptedEmbedder, ScriptedGenerator};
use ragbuddy::rag::{FallbackReranker, ModelReranker, RagPipeline, Reranker};
use ragbuddy::server::{router, AppState};
use ragbuddy::vector::MemoryStore;

struct TestServer {
    base: String,
    client: reqwest::Client,
}

impl TestServer {
    async fn start(reranker: Arc<dyn Reranker>) -> Self {
        let embedder = ScriptedEmbedder::constant(vec![0.6, 0.8])
            .with("서울은 한국의 수도이다.", vec![1.0, 0.0])
            .failing_on("FAIL");
        let pipeline = RagPipeline::new(
            Arc::new(embedder),
            Arc::new(MemoryStore::new(2)),
            reranker,
            Arc::new(ScriptedGenerator::replying("서울입니다.")),
            3,
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(AppState::new(Arc::new(pipeline)));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{}", addr),
            client: reqwest::Client::new(),
        }
    }

    async fn fallback() -> Self {
        Self::start(Arc::new(FallbackReranker::new())).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let response = self.client.post(self.url(path)).json(&body).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        let response = self.client.delete(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::fallback().await;
    let (status, body) = server.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_document_lifecycle() {
    let server = TestServer::fallback().await;

    let (status, body) = server
        .post("/api/v1/documents", json!({ "content": "서울은 한국의 수도이다." }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Document inserted successfully");
    let id = body["id"].as_u64().unwrap();

    let (status, body) = server.get(&format!("/api/v1/documents/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "서울은 한국의 수도이다.");
    assert_eq!(body["embedding"], json!([1.0, 0.0]));

    let (status, body) = server.get("/api/v1/documents/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_documents"], 1);

    let (status, _) = server.delete(&format!("/api/v1/documents/{}", id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = server.get(&format!("/api/v1/documents/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (status, _) = server.delete(&format!("/api/v1/documents/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_answers_from_documents() {
    let server = TestServer::fallback().await;
    server
        .post("/api/v1/documents", json!({ "content": "서울은 한국의 수도이다." }))
        .await;

    let (status, body) = server
        .post("/api/v1/documents/chat", json!({ "content": "한국의 수도는?" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "answer": "서울입니다." }));
}

#[tokio::test]
async fn test_empty_content_is_bad_request() {
    let server = TestServer::fallback().await;

    let (status, body) = server.post("/api/v1/documents", json!({ "content": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let (status, _) = server.post("/api/v1/documents/chat", json!({ "content": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .post("/api/v1/documents/all", json!({ "content": ["ok", ""] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server.post("/api/v1/documents/all", json!({ "content": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_bodies_are_bad_request() {
    let server = TestServer::fallback().await;

    let (status, body) = server.post("/api/v1/documents", json!({ "text": "wrong key" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let response = server
        .client
        .post(server.url("/api/v1/documents"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, _) = server.get("/api/v1/documents/not-a-number").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_batch_insert_all_succeed() {
    let server = TestServer::fallback().await;

    let (status, body) = server
        .post("/api/v1/documents/all", json!({ "content": ["one", "two", "three"] }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["inserted"], 3);
    assert!(body.get("failed_index").is_none());

    let (_, stats) = server.get("/api/v1/documents/stats").await;
    assert_eq!(stats["total_documents"], 3);
}

#[tokio::test]
async fn test_batch_insert_partial_failure() {
    let server = TestServer::fallback().await;

    let (status, body) = server
        .post(
            "/api/v1/documents/all",
            json!({ "content": ["one", "FAIL here", "three"] }),
        )
        .await;
    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert_eq!(body["inserted"], 1);
    assert_eq!(body["failed_index"], 1);
    assert_eq!(body["items"][0]["status"], "inserted");
    assert_eq!(body["items"][1]["status"], "failed");
    assert_eq!(body["items"][1]["error"]["code"], "collaborator_error");
    assert_eq!(body["items"][2]["status"], "skipped");

    // The first document stays stored
    let (_, stats) = server.get("/api/v1/documents/stats").await;
    assert_eq!(stats["total_documents"], 1);
}

#[tokio::test]
async fn test_contract_violation_is_bad_gateway() {
    let scorer = Arc::new(ScriptedGenerator::replying("These documents look relevant."));
    let server = TestServer::start(Arc::new(ModelReranker::new(scorer))).await;
    server
        .post("/api/v1/documents", json!({ "content": "서울은 한국의 수도이다." }))
        .await;

    let (status, body) = server
        .post("/api/v1/documents/chat", json!({ "content": "한국의 수도는?" }))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "contract_violation");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("These documents look relevant."));
}

#[tokio::test]
async fn test_embedding_failure_is_bad_gateway() {
    let server = TestServer::fallback().await;
    let (status, body) = server
        .post("/api/v1/documents", json!({ "content": "FAIL please" }))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "collaborator_error");
}
