use resultmail_core::errors::AppError;
use resultmail_core::StorageError;
use thiserror::Error;
use validator::ValidationErrors;

use crate::modules::results::renderer::RenderError;
use crate::utils::email::MailError;

/// Everything that can stop a result from being delivered.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid delivery request: {0}")]
    InvalidRequest(#[from] ValidationErrors),

    #[error("no recipient: neither parentEmail nor email is set")]
    NoRecipient,

    #[error("artifact storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("mail delivery failed: {0}")]
    Mail(#[from] MailError),
}

impl DeliveryError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::NoRecipient => "no_recipient",
            Self::Storage(_) => "storage",
            Self::Render(_) => "render",
            Self::Mail(MailError::Timeout(_)) => "mail_timeout",
            Self::Mail(_) => "mail",
        }
    }

    /// Collapse into one of the two caller-visible failures.
    pub fn into_app_error(self) -> AppError {
        if self.is_client_error() {
            AppError::bad_request(self)
        } else {
            AppError::delivery_failed(self)
        }
    }
}
