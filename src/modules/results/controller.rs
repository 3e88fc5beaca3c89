use axum::{Json, extract::State};
use tracing::{error, instrument, warn};

use resultmail_core::AppError;

use crate::modules::results::model::{DeliveryOutcome, DeliveryRequest};
use crate::state::AppState;
use crate::validator::DeliveryPayload;

#[utoipa::path(
    post,
    path = "/api/results/send",
    request_body = DeliveryRequest,
    responses(
        (status = 200, description = "Result email sent successfully", body = DeliveryOutcome,
            example = json!(DeliveryOutcome::sent())),
        (status = 400, description = "Invalid or incomplete data provided", body = DeliveryOutcome,
            example = json!(DeliveryOutcome::invalid())),
        (status = 500, description = "Rendering, storage or mail transport failed", body = DeliveryOutcome,
            example = json!(DeliveryOutcome::failed()))
    ),
    tag = "Results"
)]
#[instrument(skip_all)]
pub async fn send_result(
    State(state): State<AppState>,
    DeliveryPayload(request): DeliveryPayload,
) -> Result<Json<DeliveryOutcome>, AppError> {
    match state.results.deliver(&request).await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(e) => {
            if e.is_client_error() {
                warn!(kind = e.kind(), error = %e, "Rejected result delivery");
            } else {
                error!(kind = e.kind(), error = %e, "Result delivery failed");
            }
            Err(e.into_app_error())
        }
    }
}
