//! Transport-level behaviour of the push endpoint.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use clamgate_api::{ApiServer, ApiState};
use clamgate_pipeline::{AlertPayload, Notifier, RoutingConfig, TriagePipeline};
use clamgate_scanner::ScanEngine;
use clamgate_store::ObjectStore;
use clamgate_test_support::{MemoryStore, ScriptedEngine, push_envelope};

const SOURCE: &str = "staging";
const CLEAN: &str = "clean-bucket";
const QUARANTINE: &str = "quarantine-bucket";
const KEY: &str = "uploads/sample.bin";

#[derive(Default)]
struct CollectingNotifier {
    sent: Mutex<Vec<String>>,
}

impl CollectingNotifier {
    fn sent(&self) -> Vec<String> {
        self.sent.lock().expect("notifier poisoned").clone()
    }
}

#[async_trait]
impl Notifier for CollectingNotifier {
    async fn notify(&self, payload: &AlertPayload) -> anyhow::Result<()> {
        self.sent
            .lock()
            .expect("notifier poisoned")
            .push(payload.text.clone());
        Ok(())
    }
}

struct TestApi {
    store: Arc<MemoryStore>,
    engine: Arc<ScriptedEngine>,
    notifier: Arc<CollectingNotifier>,
    server: ApiServer,
    _scratch: tempfile::TempDir,
}

fn api_with(engine: ScriptedEngine) -> TestApi {
    let store = Arc::new(MemoryStore::new());
    store.insert(SOURCE, KEY, b"payload".to_vec());
    let engine = Arc::new(engine);
    let notifier = Arc::new(CollectingNotifier::default());
    let scratch = tempfile::tempdir().expect("scratch tempdir");
    let store_seam: Arc<dyn ObjectStore> = store.clone();
    let engine_seam: Arc<dyn ScanEngine> = engine.clone();
    let notifier_seam: Arc<dyn Notifier> = notifier.clone();
    let pipeline = TriagePipeline::new(
        store_seam,
        engine_seam,
        notifier_seam,
        RoutingConfig {
            dest_bucket: CLEAN.to_string(),
            quarantine_bucket: QUARANTINE.to_string(),
        },
        scratch.path().to_path_buf(),
    );
    let server = ApiServer::new(ApiState::new(Arc::new(pipeline)));
    TestApi {
        store,
        engine,
        notifier,
        server,
        _scratch: scratch,
    }
}

fn push_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("request builds")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let api = api_with(ScriptedEngine::clean());
    let response = api
        .server
        .router()
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router serves");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn full_success_is_acknowledged_with_204() {
    let api = api_with(ScriptedEngine::clean());
    let response = api
        .server
        .router()
        .oneshot(push_request(push_envelope(SOURCE, KEY)))
        .await
        .expect("router serves");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(api.store.contains(CLEAN, KEY));
    assert!(!api.store.contains(SOURCE, KEY));
}

#[tokio::test]
async fn malformed_envelope_is_rejected_without_store_access() {
    let api = api_with(ScriptedEngine::clean());
    let response = api
        .server
        .router()
        .oneshot(push_request(b"{\"nope\": true}".to_vec()))
        .await
        .expect("router serves");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response
        .into_body()
        .collect()
        .await
        .expect("body readable")
        .to_bytes();
    assert!(!body.is_empty(), "400 carries a short reason string");

    assert_eq!(api.engine.update_calls(), 0, "pipeline must not start");
    assert!(api.store.contains(SOURCE, KEY), "no store operation ran");
}

#[tokio::test]
async fn pipeline_failure_maps_to_500_for_redelivery() {
    let api = api_with(ScriptedEngine::clean());
    api.store.fail_put(true);
    let response = api
        .server
        .router()
        .oneshot(push_request(push_envelope(SOURCE, KEY)))
        .await
        .expect("router serves");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(api.store.contains(SOURCE, KEY), "source stays for retry");
}

#[tokio::test]
async fn infected_delivery_is_still_acknowledged() {
    let api = api_with(ScriptedEngine::infected("Eicar-Signature FOUND"));
    let response = api
        .server
        .router()
        .oneshot(push_request(push_envelope(SOURCE, KEY)))
        .await
        .expect("router serves");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(api.store.contains(QUARANTINE, KEY));
    assert!(!api.store.contains(SOURCE, KEY));

    let alerts = api.notifier.sent();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].contains("Eicar-Signature FOUND"));
}
