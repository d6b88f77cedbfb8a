use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use reelsift_core::api::{BackendError, DedupeBackend, HttpBackend, HttpBackendSettings};
use reelsift_model::{RawPolicy, ScanAck, TaskId, TaskIdsRequest, TaskType};
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct FakeState {
    batches: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    saved_policy: Arc<Mutex<Option<Value>>>,
    api_keys: Arc<Mutex<Vec<String>>>,
    execute_reply: Arc<Mutex<Option<Value>>>,
}

impl FakeState {
    fn record(&self, op: &str, body: TaskIdsRequest) {
        let ids = body.task_ids.into_iter().map(String::from).collect();
        self.batches.lock().unwrap().push((op.to_string(), ids));
    }
}

async fn tasks() -> Json<Value> {
    Json(json!({
        "status": "success",
        "data": [
            {
                "id": 41,
                "item_name": "Foo S01E01 Pilot",
                "item_type": "Episode",
                "task_type": "multi_version",
                "versions": [
                    {"id": "a", "path": "/tv/foo/a.mkv", "filesize": 900, "effect": "hdr10+"},
                    {"id": "b", "path": "/tv/foo/b.mkv", "filesize": 300}
                ],
                "best_version_id": "a"
            }
        ]
    }))
}

async fn policy() -> Json<Value> {
    Json(json!({
        "status": "success",
        "data": {
            "rules": [
                {"id": "effect", "enabled": true, "priority": ["dovi_p8", "sdr"]},
                {"id": "date_added", "enabled": true, "priority": "asc"}
            ],
            "keep_one_per_res": true,
            "delete_delay": 10
        }
    }))
}

async fn save_policy(State(state): State<FakeState>, Json(body): Json<Value>) -> Json<Value> {
    *state.saved_policy.lock().unwrap() = Some(body);
    Json(json!({"status": "success"}))
}

async fn scan() -> (StatusCode, Json<Value>) {
    (
        StatusCode::CONFLICT,
        Json(json!({"status": "error", "error": "scan already running"})),
    )
}

async fn execute(State(state): State<FakeState>, Json(body): Json<TaskIdsRequest>) -> Json<Value> {
    state.record("execute", body);
    let reply = state.execute_reply.lock().unwrap().clone();
    Json(reply.unwrap_or_else(|| json!({"status": "success", "message": "queued"})))
}

async fn ignore(State(state): State<FakeState>, Json(body): Json<TaskIdsRequest>) -> Json<Value> {
    state.record("ignore", body);
    Json(json!({"status": "success", "data": {"message": "ignored 2 tasks"}}))
}

async fn remove() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"status": "error", "error": "database locked"})),
    )
}

async fn libraries(State(state): State<FakeState>, headers: HeaderMap) -> Json<Value> {
    if let Some(key) = headers.get("x-api-key").and_then(|value| value.to_str().ok()) {
        state.api_keys.lock().unwrap().push(key.to_string());
    }
    Json(json!({
        "status": "success",
        "data": [{"id": 7, "name": "Movies"}]
    }))
}

async fn spawn_backend(state: FakeState) -> HttpBackend {
    let app = Router::new()
        .route("/api/v1/dedupe/tasks", get(tasks))
        .route("/api/v1/dedupe/policy", get(policy).put(save_policy))
        .route("/api/v1/dedupe/scan", post(scan))
        .route("/api/v1/dedupe/tasks/execute", post(execute))
        .route("/api/v1/dedupe/tasks/ignore", post(ignore))
        .route("/api/v1/dedupe/tasks/remove", post(remove))
        .route("/api/v1/libraries", get(libraries))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    HttpBackend::new(HttpBackendSettings {
        base_url: format!("{addr}/"),
        api_key: Some("secret".to_string()),
        ..HttpBackendSettings::default()
    })
    .unwrap()
}

fn task_ids(values: &[&str]) -> Vec<TaskId> {
    values.iter().map(|value| TaskId::new(*value).unwrap()).collect()
}

#[tokio::test]
async fn fetches_and_decodes_duplicate_tasks() {
    let backend = spawn_backend(FakeState::default()).await;

    let tasks = backend.fetch_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id.as_str(), "41");
    assert_eq!(tasks[0].task_type, TaskType::MultiVersion);
    assert_eq!(tasks[0].reclaimable_bytes(), 300);
}

#[tokio::test]
async fn policy_is_fetched_and_saved_in_persisted_shape() {
    let state = FakeState::default();
    let backend = spawn_backend(state.clone()).await;

    let raw = backend.fetch_policy().await.unwrap();
    assert!(raw.keep_one_per_resolution);
    assert_eq!(raw.delete_delay_seconds, 10);
    assert_eq!(raw.rules.len(), 2);

    backend.save_policy(&raw).await.unwrap();
    let saved = state.saved_policy.lock().unwrap().clone().unwrap();
    let echoed: RawPolicy = serde_json::from_value(saved).unwrap();
    assert_eq!(echoed, raw);
}

#[tokio::test]
async fn busy_scan_queue_is_not_an_error() {
    let backend = spawn_backend(FakeState::default()).await;

    let ack = backend.trigger_scan().await.unwrap();
    assert_eq!(
        ack,
        ScanAck::Busy {
            reason: Some("scan already running".to_string())
        }
    );
}

#[tokio::test]
async fn batch_requests_carry_task_ids_and_map_messages() {
    let state = FakeState::default();
    let backend = spawn_backend(state.clone()).await;

    let executed = backend.execute(&task_ids(&["1", "2"])).await.unwrap();
    assert_eq!(executed.message, "queued");

    let ignored = backend.ignore(&task_ids(&["3", "4"])).await.unwrap();
    assert_eq!(ignored.message, "ignored 2 tasks");

    let batches = state.batches.lock().unwrap().clone();
    assert_eq!(
        batches,
        [
            ("execute".to_string(), vec!["1".to_string(), "2".to_string()]),
            ("ignore".to_string(), vec!["3".to_string(), "4".to_string()]),
        ]
    );
}

#[tokio::test]
async fn executed_batch_with_count_payload_is_acknowledged() {
    let state = FakeState::default();
    *state.execute_reply.lock().unwrap() =
        Some(json!({"status": "success", "data": 2, "message": "2 tasks queued"}));
    let backend = spawn_backend(state.clone()).await;

    let outcome = backend.execute(&task_ids(&["1", "2"])).await.unwrap();
    assert_eq!(outcome.message, "2 tasks queued");
    assert_eq!(state.batches.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn server_errors_surface_reason_and_are_retryable() {
    let backend = spawn_backend(FakeState::default()).await;

    let err = backend.remove(&task_ids(&["1"])).await.unwrap_err();
    match &err {
        BackendError::Status { status, reason, .. } => {
            assert_eq!(*status, 500);
            assert_eq!(reason, "database locked");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn libraries_accept_numeric_ids_and_send_api_key() {
    let state = FakeState::default();
    let backend = spawn_backend(state.clone()).await;

    let libraries = backend.fetch_libraries().await.unwrap();
    assert_eq!(libraries[0].id.as_str(), "7");
    assert_eq!(libraries[0].display_name, "Movies");
    assert_eq!(*state.api_keys.lock().unwrap(), ["secret"]);
}

#[tokio::test]
async fn unreachable_backend_is_a_retryable_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(HttpBackendSettings {
        base_url: format!("http://{addr}"),
        ..HttpBackendSettings::default()
    })
    .unwrap();
    let err = backend.fetch_tasks().await.unwrap_err();
    assert!(matches!(err, BackendError::Transport { .. }));
    assert!(err.is_retryable());
}
