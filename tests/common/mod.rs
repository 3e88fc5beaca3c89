use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use resultmail::resultmail_config::CorsConfig;
use resultmail::router::init_router;
use resultmail::state::AppState;
use resultmail::utils::email::Mailer;
use resultmail_core::LocalArtifactStore;
use serde_json::{Value, json};
use tower::ServiceExt;

pub fn setup_test_app(artifact_dir: &Path, mailer: Arc<dyn Mailer>) -> axum::Router {
    let store = Arc::new(LocalArtifactStore::new(artifact_dir.to_path_buf()));
    let state = AppState::new(
        store,
        mailer,
        CorsConfig::from_origins("http://localhost:3000"),
        None,
    );
    init_router(state)
}

/// POST a raw body to the delivery endpoint and return status and JSON body.
pub async fn post_raw(app: axum::Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/results/send")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body).unwrap();

    (status, body)
}

pub async fn send_result(app: axum::Router, body: Value) -> (StatusCode, Value) {
    post_raw(app, serde_json::to_string(&body).unwrap()).await
}

pub fn delivery_body(enrollment_no: &str, email: &str, parent_email: &str) -> Value {
    json!({
        "studentDetails": {
            "enrollmentNo": enrollment_no,
            "firstName": "A",
            "middleName": "",
            "lastName": "B",
            "branch": "CS",
            "semester": "5",
            "email": email,
            "parentEmail": parent_email
        },
        "marks": {
            "internal": { "DS": "88" },
            "external": { "DS": "92" }
        }
    })
}

/// True when the directory has no entries or was never created.
pub fn dir_is_empty(dir: &Path) -> bool {
    match std::fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(e) => e.kind() == std::io::ErrorKind::NotFound,
    }
}
