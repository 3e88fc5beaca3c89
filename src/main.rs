use anyhow::Context;
use dotenvy::dotenv;
use resultmail::logging::{init_tracing, shutdown_tracer};
use resultmail::metrics::init_metrics;
use resultmail::router::init_router;
use resultmail::state::init_app_state;
use resultmail_config::{ArtifactConfig, CorsConfig, MailConfig, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing()?;
    let metrics = init_metrics()?;

    let mail_config = MailConfig::from_env().context("Invalid mail configuration")?;
    let artifact_config = ArtifactConfig::from_env();
    let server_config = ServerConfig::from_env().context("Invalid server configuration")?;

    info!(
        smtp_host = %mail_config.smtp_host,
        smtp_port = mail_config.smtp_port,
        artifact_dir = %artifact_config.dir.display(),
        "Configuration loaded"
    );

    let state = init_app_state(
        &mail_config,
        &artifact_config,
        CorsConfig::from_env(),
        metrics,
    )
    .context("Failed to initialize mail transport")?;
    let app = init_router(state);

    let addr = server_config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 Server running on http://{}", addr);
    info!("📚 Swagger UI available at http://{}/swagger-ui", addr);
    info!("📖 Scalar UI available at http://{}/scalar", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    shutdown_tracer();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received, draining in-flight deliveries");
}
