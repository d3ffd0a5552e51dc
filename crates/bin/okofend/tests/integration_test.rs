//! End-to-end tests for the okofend stack.
//!
//! Each test wires the real router, gateway and execution slot around the
//! worker-process runner, with `/bin/sh` scripts standing in for the worker.
//! Requests go through `tower::ServiceExt::oneshot`; no TCP port is bound.

#![cfg(unix)]

use std::path::PathBuf;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use okofen_adapter_http_axum::auth::BearerToken;
use okofen_adapter_http_axum::router;
use okofen_adapter_http_axum::state::AppState;
use okofen_adapter_worker_process::WorkerProcessRunner;
use okofen_app::services::command_gateway::CommandGateway;
use okofen_app::services::execution_slot::ExecutionSlot;
use tower::ServiceExt;

const TOKEN: &str = "integration-token";

const SWITCHED: &str = r#"echo "step: $1"
echo "OKOFEN_SUMMARY:{\"ok\":true,\"action\":\"$1\",\"status_before\":\"on\",\"status_after\":\"off\",\"changed\":true,\"duration_ms\":12,\"message\":\"done\",\"error\":null}""#;

/// Build a fully-wired router whose worker is `sh -c <script> worker <action>`.
fn app(script: &str, deadline: Duration) -> axum::Router {
    let runner = WorkerProcessRunner::new(
        "/bin/sh",
        vec!["-c".to_string(), script.to_string(), "worker".to_string()],
    );
    let state = AppState::new(
        CommandGateway::new(runner, ExecutionSlot::new(), deadline),
        BearerToken::new(TOKEN),
        Some(PathBuf::from("/bin/sh")),
    );
    router::build(state)
}

fn command(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("okofend-it-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_report_worker_in_health_check() {
    let resp = app(SWITCHED, Duration::from_secs(30))
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["script_path"], "/bin/sh");
    assert_eq!(body["script_readable"], true);
    assert_eq!(body["timeout_s"], 30);
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_require_bearer_before_running_worker() {
    let resp = app(SWITCHED, Duration::from_secs(30))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/off")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(resp).await["error"], "missing_bearer");
}

#[tokio::test]
async fn should_return_worker_summary_on_success() {
    let resp = app(SWITCHED, Duration::from_secs(30))
        .oneshot(command("/off"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["action"], "off");
    assert_eq!(body["status_before"], "on");
    assert_eq!(body["status_after"], "off");
    assert_eq!(body["action_taken"], true);
    assert_eq!(body["message"], "heating turned off");
    assert!(body.get("error_code").is_none());
}

#[tokio::test]
async fn should_report_opaque_success_when_worker_prints_no_summary() {
    let resp = app("echo working", Duration::from_secs(30))
        .oneshot(command("/on"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["status_before"], serde_json::Value::Null);
    assert_eq!(body["action_taken"], serde_json::Value::Null);
}

#[tokio::test]
async fn should_map_worker_failure_to_script_error() {
    let resp = app("echo 'login page missing' >&2; exit 3", Duration::from_secs(30))
        .oneshot(command("/on"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(resp).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["error_code"], "script_error");
    assert!(body["output"].as_str().unwrap().contains("login page missing"));
}

#[tokio::test]
async fn should_reject_second_concurrent_command_as_busy() {
    let script = format!("sleep 1\n{SWITCHED}");
    let app = app(&script, Duration::from_secs(30));

    let (first, second) = tokio::join!(
        app.clone().oneshot(command("/off")),
        app.clone().oneshot(command("/off")),
    );
    let mut statuses = [first.unwrap().status(), second.unwrap().status()];
    statuses.sort_by_key(StatusCode::as_u16);

    assert_eq!(statuses, [StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]);
}

#[tokio::test]
async fn should_time_out_and_accept_next_command() {
    let dir = scratch_dir("timeout");
    let marker = dir.join("first-run");
    let script = format!(
        "if [ -f '{marker}' ]; then\n{SWITCHED}\nelse touch '{marker}'; echo 'waiting for panel'; sleep 30; fi",
        marker = marker.display()
    );
    let app = app(&script, Duration::from_millis(500));

    let resp = app.clone().oneshot(command("/off")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
    let body = json_body(resp).await;
    assert_eq!(body["error_code"], "timeout");
    assert!(body["output"].as_str().unwrap().contains("waiting for panel"));

    let resp = app.oneshot(command("/off")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let _ = std::fs::remove_dir_all(dir);
}
