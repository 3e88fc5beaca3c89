use std::sync::Arc;

use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use resultmail_core::{ArtifactHandle, ArtifactStore};
use resultmail_models::StudentRecord;
use tracing::{info, instrument};

use crate::modules::results::error::DeliveryError;
use crate::utils::email::{MailError, Mailer};

pub const RESULT_SUBJECT: &str = "Student Result";
pub const RESULT_BODY: &str = "Please find attached the result of the student.";

/// Parent email when present and non-blank, otherwise the student's own.
pub fn resolve_recipient(student: &StudentRecord) -> Option<&str> {
    student.parent_email().or_else(|| student.email())
}

/// Composes result emails and hands them to the transport.
///
/// The dispatcher reads the artifact but never removes it; cleanup belongs to
/// whoever allocated the handle.
#[derive(Clone)]
pub struct ResultDispatcher {
    mailer: Arc<dyn Mailer>,
    store: Arc<dyn ArtifactStore>,
}

impl ResultDispatcher {
    pub fn new(mailer: Arc<dyn Mailer>, store: Arc<dyn ArtifactStore>) -> Self {
        Self { mailer, store }
    }

    #[instrument(skip(self, body, attachment), fields(artifact = %attachment.key()))]
    pub async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        attachment: &ArtifactHandle,
    ) -> Result<(), DeliveryError> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {}", recipient, e)))?;

        let content = self.store.read(attachment).await?;

        let pdf = ContentType::parse("application/pdf")
            .map_err(|e| MailError::Build(format!("Invalid content type: {}", e)))?;

        let message = Message::builder()
            .from(self.mailer.sender().clone())
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body.to_string()))
                    .singlepart(Attachment::new(attachment.attachment_name()).body(content, pdf)),
            )
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.mailer.send(message).await?;

        info!(recipient = %recipient, "Result email handed to transport");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(parent_email: &str, email: &str) -> StudentRecord {
        serde_json::from_value(json!({
            "enrollmentNo": "E100",
            "email": email,
            "parentEmail": parent_email,
        }))
        .unwrap()
    }

    #[test]
    fn test_parent_email_takes_precedence() {
        let student = record("p@x.com", "s@x.com");
        assert_eq!(resolve_recipient(&student), Some("p@x.com"));
    }

    #[test]
    fn test_blank_parent_email_falls_back_to_student() {
        let student = record("", "s@x.com");
        assert_eq!(resolve_recipient(&student), Some("s@x.com"));

        let student = record("   ", "s@x.com");
        assert_eq!(resolve_recipient(&student), Some("s@x.com"));
    }

    #[test]
    fn test_no_email_at_all_resolves_to_none() {
        let student: StudentRecord =
            serde_json::from_value(json!({ "enrollmentNo": "E100" })).unwrap();
        assert_eq!(resolve_recipient(&student), None);

        let student = record("", "");
        assert_eq!(resolve_recipient(&student), None);
    }
}
