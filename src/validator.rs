use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde_json::Value;
use validator::{ValidationErrors, ValidationErrorsKind};

use resultmail_core::AppError;

use crate::modules::results::model::DeliveryRequest;

const REQUIRED_SECTIONS: [&str; 2] = ["studentDetails", "marks"];

fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_errors(None, errors, &mut messages);
    messages.join(", ")
}

fn collect_errors(prefix: Option<&str>, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, field),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", path))
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_errors(Some(&path), nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_errors(Some(&format!("{}[{}]", path, index)), nested, out);
                }
            }
        }
    }
}

/// Delivery request body, checked for shape before any work is done.
///
/// Every rejection, whatever its cause, becomes the same 400 response; the
/// cause is kept on the error for logging.
#[derive(Debug, Clone)]
pub struct DeliveryPayload(pub DeliveryRequest);

impl<S> FromRequest<S> for DeliveryPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(anyhow!("{}", rejection.body_text())))?;

        for section in REQUIRED_SECTIONS {
            match body.get(section) {
                Some(Value::Object(map)) if !map.is_empty() => {}
                Some(Value::Object(_)) => {
                    return Err(AppError::bad_request(anyhow!("{} is empty", section)));
                }
                Some(_) => {
                    return Err(AppError::bad_request(anyhow!("{} must be an object", section)));
                }
                None => {
                    return Err(AppError::bad_request(anyhow!("{} is required", section)));
                }
            }
        }

        let request: DeliveryRequest = serde_json::from_value(body)
            .map_err(|e| AppError::bad_request(anyhow!("Invalid field type in request: {}", e)))?;

        validator::Validate::validate(&request)
            .map_err(|errors| AppError::bad_request(anyhow!("{}", format_errors(&errors))))?;

        Ok(DeliveryPayload(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use serde_json::json;

    async fn extract(body: Body, content_type: Option<&str>) -> Result<DeliveryPayload, AppError> {
        let mut builder = Request::builder().method("POST").uri("/api/results/send");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let req = builder.body(body).unwrap();
        DeliveryPayload::from_request(req, &()).await
    }

    async fn extract_json(value: Value) -> Result<DeliveryPayload, AppError> {
        extract(Body::from(value.to_string()), Some("application/json")).await
    }

    #[tokio::test]
    async fn test_accepts_complete_request() {
        let DeliveryPayload(request) = extract_json(json!({
            "studentDetails": { "enrollmentNo": 42, "email": "a@x.com" },
            "marks": { "internal": { "DS": 88 } }
        }))
        .await
        .unwrap();

        assert_eq!(request.student_details.enrollment_no(), "42");
        assert_eq!(request.marks.internal_entries(), vec![("DS", "88".to_string())]);
    }

    #[tokio::test]
    async fn test_rejects_missing_or_empty_sections() {
        let cases = [
            json!({ "studentDetails": { "enrollmentNo": "E100" } }),
            json!({ "marks": { "internal": {} } }),
            json!({ "studentDetails": { "enrollmentNo": "E100" }, "marks": {} }),
            json!({ "studentDetails": {}, "marks": { "internal": {} } }),
            json!({ "studentDetails": "E100", "marks": { "internal": {} } }),
            json!({ "studentDetails": { "enrollmentNo": "E100" }, "marks": null }),
        ];

        for body in cases {
            let err = extract_json(body.clone()).await.unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST, "body: {}", body);
        }
    }

    #[tokio::test]
    async fn test_rejects_blank_enrollment_number() {
        let err = extract_json(json!({
            "studentDetails": { "enrollmentNo": "  ", "email": "a@x.com" },
            "marks": { "internal": { "DS": "88" } }
        }))
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.error.to_string().contains("enrollmentNo"));
    }

    #[tokio::test]
    async fn test_rejects_non_object_grouping() {
        let err = extract_json(json!({
            "studentDetails": { "enrollmentNo": "E100" },
            "marks": { "internal": ["DS", 88] }
        }))
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_malformed_json_and_missing_content_type() {
        let err = extract(Body::from("{not json"), Some("application/json"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = extract(Body::from(r#"{"studentDetails":{}}"#), None)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
