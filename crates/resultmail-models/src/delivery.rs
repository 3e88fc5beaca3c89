//! Delivery request and outcome.

use resultmail_core::errors::{DELIVERY_FAILED_MESSAGE, INVALID_REQUEST_MESSAGE};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::marks::MarksRecord;
use crate::students::StudentRecord;

pub const SENT_MESSAGE: &str = "Result email sent successfully.";

/// Student identity and marks, submitted together.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRequest {
    #[validate(nested)]
    pub student_details: StudentRecord,
    pub marks: MarksRecord,
}

/// The only thing a caller learns about a delivery attempt.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct DeliveryOutcome {
    pub success: bool,
    pub message: String,
}

impl DeliveryOutcome {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: SENT_MESSAGE.to_string(),
        }
    }

    pub fn invalid() -> Self {
        Self {
            success: false,
            message: INVALID_REQUEST_MESSAGE.to_string(),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            message: DELIVERY_FAILED_MESSAGE.to_string(),
        }
    }
}
