use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Message returned for any request whose body is structurally unusable.
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid or incomplete data provided.";

/// Message returned for any failure after validation succeeded.
pub const DELIVERY_FAILED_MESSAGE: &str = "Error sending result email.";

/// Error returned from HTTP handlers.
///
/// `message` is the only text that reaches the caller. `error` carries the
/// underlying cause for logs and is never serialized.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: &'static str,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, message: &'static str, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            message,
            error: err.into(),
        }
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, INVALID_REQUEST_MESSAGE, err)
    }

    pub fn delivery_failed<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            DELIVERY_FAILED_MESSAGE,
            err,
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "message": self.message,
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::delivery_failed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_bad_request_uses_fixed_message() {
        let err = AppError::bad_request(anyhow!("studentDetails is empty"));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, INVALID_REQUEST_MESSAGE);
    }

    #[test]
    fn test_from_any_error_is_delivery_failure() {
        let io = std::io::Error::other("disk full");
        let err: AppError = io.into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, DELIVERY_FAILED_MESSAGE);
        assert_eq!(err.error.to_string(), "disk full");
    }

    #[tokio::test]
    async fn test_response_body_hides_cause() {
        let response =
            AppError::delivery_failed(anyhow!("smtp auth rejected for secret-user")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], DELIVERY_FAILED_MESSAGE);
        assert!(!String::from_utf8_lossy(&bytes).contains("secret-user"));
    }
}
