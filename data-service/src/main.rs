use data_service::config::DataConfig;
use data_service::services::init_metrics;
use data_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DataConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "data-service",
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    );

    // Initialize metrics recorder (must be before any metrics are recorded)
    init_metrics();

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start data-service: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    app.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
