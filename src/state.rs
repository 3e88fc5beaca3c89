use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use resultmail_config::{ArtifactConfig, CorsConfig, MailConfig};
use resultmail_core::{ArtifactStore, LocalArtifactStore};

use crate::modules::results::ResultService;
use crate::utils::email::{MailError, Mailer, SmtpMailer};

#[derive(Clone)]
pub struct AppState {
    pub results: Arc<ResultService>,
    pub cors_config: CorsConfig,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        mailer: Arc<dyn Mailer>,
        cors_config: CorsConfig,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            results: Arc::new(ResultService::new(store, mailer)),
            cors_config,
            metrics,
        }
    }
}

/// Build the production state: local artifact directory and pooled SMTP transport.
pub fn init_app_state(
    mail_config: &MailConfig,
    artifact_config: &ArtifactConfig,
    cors_config: CorsConfig,
    metrics: Option<PrometheusHandle>,
) -> Result<AppState, MailError> {
    let store = Arc::new(LocalArtifactStore::new(artifact_config.dir.clone()));
    let mailer = Arc::new(SmtpMailer::new(mail_config)?);

    Ok(AppState::new(store, mailer, cors_config, metrics))
}
