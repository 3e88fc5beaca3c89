use std::sync::Arc;

use resultmail_core::{ArtifactHandle, ArtifactStore, StorageError};
use resultmail_models::{DeliveryOutcome, DeliveryRequest};
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

use crate::metrics::{track_artifact_bytes, track_cleanup_failure, track_delivery};
use crate::modules::results::dispatcher::{
    RESULT_BODY, RESULT_SUBJECT, ResultDispatcher, resolve_recipient,
};
use crate::modules::results::error::DeliveryError;
use crate::modules::results::renderer::ResultRenderer;
use crate::utils::email::Mailer;

/// Exclusive ownership of one artifact for the length of a delivery attempt.
///
/// [`ArtifactLease::release`] deletes the artifact. A lease dropped without
/// being released (the request future was cancelled) schedules the deletion
/// on the runtime instead.
pub struct ArtifactLease {
    store: Arc<dyn ArtifactStore>,
    handle: ArtifactHandle,
    released: bool,
}

impl ArtifactLease {
    pub fn new(store: Arc<dyn ArtifactStore>, handle: ArtifactHandle) -> Self {
        Self {
            store,
            handle,
            released: false,
        }
    }

    pub fn handle(&self) -> &ArtifactHandle {
        &self.handle
    }

    pub async fn release(mut self) -> Result<(), StorageError> {
        let result = self.store.delete(&self.handle).await;
        self.released = true;
        result
    }
}

impl Drop for ArtifactLease {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let store = Arc::clone(&self.store);
        let handle = self.handle.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                warn!(artifact = %handle.key(), "Artifact lease dropped before release, scheduling removal");
                runtime.spawn(async move {
                    if let Err(e) = store.delete(&handle).await {
                        track_cleanup_failure();
                        error!(artifact = %handle.key(), error = %e, "Failed to remove abandoned artifact");
                    }
                });
            }
            Err(_) => {
                track_cleanup_failure();
                error!(artifact = %handle.key(), "Artifact lease dropped outside a runtime, artifact left behind");
            }
        }
    }
}

/// Renders a student's result, mails it, and removes the rendered document.
pub struct ResultService {
    store: Arc<dyn ArtifactStore>,
    renderer: ResultRenderer,
    dispatcher: ResultDispatcher,
}

impl ResultService {
    pub fn new(store: Arc<dyn ArtifactStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            renderer: ResultRenderer::new(Arc::clone(&store)),
            dispatcher: ResultDispatcher::new(mailer, Arc::clone(&store)),
            store,
        }
    }

    /// Deliver one result.
    ///
    /// Nothing is created before the request is validated and a recipient is
    /// resolved. Once an artifact has been allocated it is deleted exactly
    /// once before this returns, whatever the outcome; a cleanup failure is
    /// logged and does not change the result.
    #[instrument(
        skip(self, request),
        fields(enrollment_no = %request.student_details.enrollment_no())
    )]
    pub async fn deliver(&self, request: &DeliveryRequest) -> Result<DeliveryOutcome, DeliveryError> {
        let result = self.try_deliver(request).await;

        match &result {
            Ok(_) => track_delivery("sent"),
            Err(e) => track_delivery(e.kind()),
        }

        result
    }

    async fn try_deliver(&self, request: &DeliveryRequest) -> Result<DeliveryOutcome, DeliveryError> {
        request.validate()?;

        let student = &request.student_details;
        let recipient = resolve_recipient(student).ok_or(DeliveryError::NoRecipient)?;

        let lease = ArtifactLease::new(
            Arc::clone(&self.store),
            self.store.allocate(student.enrollment_no())?,
        );

        let sent = self.render_and_send(lease.handle(), recipient, request).await;

        let key = lease.handle().key().to_string();
        match lease.release().await {
            Ok(()) => debug!(artifact = %key, "Artifact removed"),
            Err(e) => {
                track_cleanup_failure();
                warn!(artifact = %key, error = %e, "Failed to remove artifact");
            }
        }

        sent.map(|_| DeliveryOutcome::sent())
    }

    async fn render_and_send(
        &self,
        handle: &ArtifactHandle,
        recipient: &str,
        request: &DeliveryRequest,
    ) -> Result<(), DeliveryError> {
        let written = self
            .renderer
            .render(handle, &request.student_details, &request.marks)
            .await?;
        track_artifact_bytes(written);
        info!(artifact = %handle.key(), bytes = written, "Artifact rendered");

        self.dispatcher
            .send(recipient, RESULT_SUBJECT, RESULT_BODY, handle)
            .await?;
        info!(artifact = %handle.key(), "Result email sent");

        Ok(())
    }
}
