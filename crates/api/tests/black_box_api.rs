use std::sync::Arc;
use std::time::Duration;

use jobstatus_api::app::services::AppServices;
use jobstatus_core::{JobId, StoreStatusCode};
use jobstatus_infra::{InMemoryQueueStore, StoreConfig};
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    store: Arc<InMemoryQueueStore>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with_timeout(Duration::from_secs(10)).await
    }

    async fn spawn_with_timeout(request_timeout: Duration) -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        let store = InMemoryQueueStore::arc();
        let services = AppServices::in_memory(store.clone(), &StoreConfig::default());
        let app = jobstatus_api::app::build_app(services, request_timeout);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            store,
            handle,
        }
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_and_readiness() {
    let srv = TestServer::spawn().await;

    assert_eq!(srv.get("/health").await.status(), StatusCode::OK);

    let res = srv.get("/ready").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({"store": "memory", "ready": true}));

    srv.store.set_unavailable(true);
    assert_eq!(
        srv.get("/ready").await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn queued_jobs_report_reverse_position() {
    let srv = TestServer::spawn().await;
    for id in ["a", "b", "c"] {
        srv.store.push_pending(&JobId::from(id));
    }

    for (id, position) in [("a", 3), ("b", 2), ("c", 1)] {
        let res = srv.get(&format!("/jobs/{id}")).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body, json!({"status": "queued", "queue_position": position}));
    }
}

#[tokio::test]
async fn terminal_and_running_jobs_map_store_codes() {
    let srv = TestServer::spawn().await;
    let cases = [
        ("ok", StoreStatusCode::Success, "complete"),
        ("bad", StoreStatusCode::Failure, "failed"),
        ("busy", StoreStatusCode::Started, "running"),
        ("gone", StoreStatusCode::Revoked, "revoked"),
    ];
    for (id, code, _) in cases {
        srv.store.set_result(&JobId::from(id), code, json!(null));
    }

    for (id, _, expected) in cases {
        let body: serde_json::Value = srv.get(&format!("/jobs/{id}")).await.json().await.unwrap();
        assert_eq!(body, json!({"status": expected}));
    }
}

#[tokio::test]
async fn claimed_job_without_result_is_starting() {
    let srv = TestServer::spawn().await;
    srv.store.insert_unacked("7", &JobId::from("claimed"));

    let body: serde_json::Value = srv.get("/jobs/claimed").await.json().await.unwrap();
    assert_eq!(body, json!({"status": "starting"}));
}

#[tokio::test]
async fn unknown_job_is_invalid_token() {
    let srv = TestServer::spawn().await;

    let res = srv.get("/jobs/nobody-knows").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({"status": "invalid token"}));
}

#[tokio::test]
async fn blank_job_id_is_rejected() {
    let srv = TestServer::spawn().await;

    let res = srv.get("/jobs/%20").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_job_id");
}

#[tokio::test]
async fn result_endpoint_returns_payload_or_404() {
    let srv = TestServer::spawn().await;
    let job = JobId::from("render-1");
    srv.store
        .set_result(&job, StoreStatusCode::Success, json!({"image": "out.png"}));

    let res = srv.get("/jobs/render-1/result").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["job_id"], "render-1");
    assert_eq!(body["status"], "complete");
    assert_eq!(body["result"]["image"], "out.png");

    let res = srv.get("/jobs/missing/result").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn queue_length_and_ids() {
    let srv = TestServer::spawn().await;
    srv.store.push_pending(&JobId::from("a"));
    srv.store.push_pending(&JobId::from("b"));

    let body: serde_json::Value = srv.get("/queue/length").await.json().await.unwrap();
    assert_eq!(body, json!({"length": 2}));

    let body: serde_json::Value = srv.get("/queue").await.json().await.unwrap();
    assert_eq!(body, json!({"ids": ["a", "b"]}));
}

#[tokio::test]
async fn store_outage_is_503() {
    let srv = TestServer::spawn().await;
    srv.store.set_unavailable(true);

    let res = srv.get("/jobs/anything").await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "store_unavailable");

    assert_eq!(
        srv.get("/queue/length").await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn result_with_unmapped_code_is_still_returned() {
    let srv = TestServer::spawn().await;
    srv.store.set_result_raw(
        &JobId::from("render-2"),
        br#"{"status": "PROGRESS", "result": {"step": 3}}"#.to_vec(),
    );

    let res = srv.get("/jobs/render-2/result").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["store_code"], "PROGRESS");
    assert_eq!(body["result"]["step"], 3);
    assert!(body.get("status").is_none());

    // Status resolution still refuses to guess.
    assert_eq!(
        srv.get("/jobs/render-2").await.status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn slow_requests_time_out() {
    let srv = TestServer::spawn_with_timeout(Duration::from_millis(50)).await;
    srv.store.set_latency(Duration::from_millis(500));

    let res = srv.get("/jobs/slow").await;
    assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "request_timeout");
}
