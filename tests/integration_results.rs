mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{delivery_body, dir_is_empty, post_raw, send_result, setup_test_app};
use http_body_util::BodyExt;
use resultmail::testing::{FailingMailer, RecordingMailer};
use resultmail::utils::email::MailError;
use serde_json::json;
use tower::ServiceExt;

const SENT: &str = "Result email sent successfully.";
const INVALID: &str = "Invalid or incomplete data provided.";
const FAILED: &str = "Error sending result email.";

#[tokio::test]
async fn test_send_result_success() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = dir.path().join("artifacts");
    let mailer = Arc::new(RecordingMailer::default());
    let app = setup_test_app(&artifacts, mailer.clone());

    let (status, body) = send_result(app, delivery_body("E100", "a@x.com", "")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": SENT }));

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipients, vec!["a@x.com".to_string()]);
    assert!(sent[0].raw.contains("Subject: Student Result"));
    assert!(sent[0].raw.contains("Please find attached the result of the student."));
    assert!(sent[0].raw.contains("result_E100.pdf"));
    assert!(sent[0].raw.contains("application/pdf"));

    assert!(dir_is_empty(&artifacts));
}

#[tokio::test]
async fn test_parent_email_takes_precedence() {
    let dir = tempfile::tempdir().unwrap();
    let mailer = Arc::new(RecordingMailer::default());
    let app = setup_test_app(dir.path(), mailer.clone());

    let (status, _) = send_result(app, delivery_body("E100", "s@x.com", "p@x.com")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(mailer.sent()[0].recipients, vec!["p@x.com".to_string()]);
}

#[tokio::test]
async fn test_numeric_fields_are_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let mailer = Arc::new(RecordingMailer::default());
    let app = setup_test_app(dir.path(), mailer.clone());

    let (status, _) = send_result(
        app,
        json!({
            "studentDetails": { "enrollmentNo": 2021001, "semester": 5, "email": "a@x.com" },
            "marks": { "internal": { "DS": 88, "OS": 91.5 } }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(mailer.sent()[0].raw.contains("result_2021001.pdf"));
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn test_empty_marks_is_rejected_without_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = dir.path().join("artifacts");
    let mailer = Arc::new(RecordingMailer::default());
    let app = setup_test_app(&artifacts, mailer.clone());

    let mut body = delivery_body("E100", "a@x.com", "");
    body["marks"] = json!({});
    let (status, body) = send_result(app, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "message": INVALID }));
    assert!(mailer.sent().is_empty());
    assert!(!artifacts.exists());
}

#[tokio::test]
async fn test_missing_student_details_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mailer = Arc::new(RecordingMailer::default());
    let app = setup_test_app(dir.path(), mailer.clone());

    let (status, body) = send_result(
        app,
        json!({ "marks": { "internal": { "DS": "88" } } }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], INVALID);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_non_object_sections_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mailer = Arc::new(RecordingMailer::default());

    for body in [
        json!({ "studentDetails": "E100", "marks": { "internal": { "DS": "88" } } }),
        json!({ "studentDetails": { "enrollmentNo": "E100" }, "marks": [1, 2] }),
        json!({ "studentDetails": { "enrollmentNo": "E100" }, "marks": { "internal": "88" } }),
    ] {
        let app = setup_test_app(dir.path(), mailer.clone());
        let (status, response) = send_result(app, body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(response["message"], INVALID);
    }

    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mailer = Arc::new(RecordingMailer::default());
    let app = setup_test_app(dir.path(), mailer.clone());

    let (status, body) = post_raw(app, "{\"studentDetails\": ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "message": INVALID }));
}

#[tokio::test]
async fn test_blank_enrollment_number_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mailer = Arc::new(RecordingMailer::default());
    let app = setup_test_app(dir.path(), mailer.clone());

    let (status, _) = send_result(app, delivery_body("   ", "a@x.com", "")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_mail_failure_returns_generic_error_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = dir.path().join("artifacts");
    let mailer = Arc::new(FailingMailer::new(|| {
        MailError::Timeout(Duration::from_secs(30))
    }));
    let app = setup_test_app(&artifacts, mailer.clone());

    let (status, body) = send_result(app, delivery_body("E100", "a@x.com", "")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "message": FAILED }));
    assert_eq!(mailer.attempts(), 1);
    assert!(dir_is_empty(&artifacts));
}

#[tokio::test]
async fn test_missing_recipient_is_a_delivery_failure() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = dir.path().join("artifacts");
    let mailer = Arc::new(RecordingMailer::default());
    let app = setup_test_app(&artifacts, mailer.clone());

    let (status, body) = send_result(app, delivery_body("E100", "", "")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], FAILED);
    assert!(mailer.sent().is_empty());
    assert!(!artifacts.exists());
}

#[tokio::test]
async fn test_unwritable_artifact_dir_is_a_delivery_failure() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = dir.path().join("artifacts");
    std::fs::write(&artifacts, b"occupied").unwrap();

    let mailer = Arc::new(RecordingMailer::default());
    let app = setup_test_app(&artifacts, mailer.clone());

    let (status, body) = send_result(app, delivery_body("E100", "a@x.com", "")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "message": FAILED }));
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_repeated_delivery_for_same_student() {
    let dir = tempfile::tempdir().unwrap();
    let mailer = Arc::new(RecordingMailer::default());

    for _ in 0..3 {
        let app = setup_test_app(dir.path(), mailer.clone());
        let (status, _) = send_result(app, delivery_body("E100", "a@x.com", "")).await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(mailer.sent().len(), 3);
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn test_health_check() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_test_app(dir.path(), Arc::new(RecordingMailer::default()));

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "ok");
}
