//! One-shot import of the dataset file into MongoDB.

use data_service::config::DataConfig;
use data_service::services::{import_records, load_records, MongoDb};
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DataConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "import-data",
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    );

    let records = load_records(&config.import_file).await.map_err(|e| {
        tracing::error!(path = %config.import_file.display(), "Failed to read import file: {}", e);
        anyhow::anyhow!("Failed to read {}: {}", config.import_file.display(), e)
    })?;

    let db = MongoDb::connect(&config.mongodb).await.map_err(|e| {
        tracing::error!("Failed to configure MongoDB client: {}", e);
        anyhow::anyhow!("Database connection error: {}", e)
    })?;

    db.health_check()
        .await
        .map_err(|e| anyhow::anyhow!("Database connection error: {}", e))?;

    let inserted = import_records(&db, &records)
        .await
        .map_err(|e| anyhow::anyhow!("Import failed: {}", e))?;

    tracing::info!(inserted, "Data imported successfully!");
    Ok(())
}
