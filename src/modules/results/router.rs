use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::send_result;

pub fn init_results_router() -> Router<AppState> {
    Router::new().route("/send", post(send_result))
}
