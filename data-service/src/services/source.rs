//! Where `GET /data` reads its records from.
//!
//! The backend is picked once by [`resolve_source`] and never re-probed.

use crate::config::DataConfig;
use crate::models::{normalize_records, Record};
use crate::services::database::MongoDb;
use crate::services::metrics::record_records_served;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Bson};
use mongodb::options::FindOptions;
use serde::Serialize;
use service_core::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    Store,
    File,
}

impl SourceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceMode::Store => "store",
            SourceMode::File => "file",
        }
    }
}

#[async_trait]
pub trait RecordSource: Send + Sync {
    fn mode(&self) -> SourceMode;

    /// Every record, in source order.
    async fn fetch_all(&self) -> Result<Vec<Record>, AppError>;

    /// Whether the source can currently serve reads.
    async fn health_check(&self) -> Result<(), AppError>;
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn not_found(&self) -> AppError {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string());
        AppError::NotFound(anyhow::anyhow!("{} not found", name))
    }
}

#[async_trait]
impl RecordSource for FileSource {
    fn mode(&self) -> SourceMode {
        SourceMode::File
    }

    async fn fetch_all(&self) -> Result<Vec<Record>, AppError> {
        if !self.path.exists() {
            return Err(self.not_found());
        }

        let contents = fs::read_to_string(&self.path).await?;
        let raw: serde_json::Value = serde_json::from_str(&contents)?;
        let records = normalize_records(raw);

        record_records_served(SourceMode::File, records.len());
        Ok(records)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        if self.path.exists() {
            Ok(())
        } else {
            Err(AppError::ServiceUnavailable)
        }
    }
}

pub struct MongoSource {
    db: MongoDb,
}

impl MongoSource {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordSource for MongoSource {
    fn mode(&self) -> SourceMode {
        SourceMode::Store
    }

    async fn fetch_all(&self) -> Result<Vec<Record>, AppError> {
        let options = FindOptions::builder().projection(doc! { "_id": 0 }).build();

        let documents: Vec<_> = self
            .db
            .records()
            .find(None, options)
            .await?
            .try_collect()
            .await?;

        let records: Vec<Record> = documents
            .into_iter()
            .map(|document| Bson::Document(document).into_relaxed_extjson())
            .collect();

        record_records_served(SourceMode::Store, records.len());
        Ok(records)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.db.health_check().await
    }
}

/// Pick the record source for this process.
///
/// With a connection string the store is pinged once; if that fails for any
/// reason the fallback file is used instead and startup carries on.
pub async fn resolve_source(config: &DataConfig) -> Arc<dyn RecordSource> {
    if config.mongodb.uri.is_none() {
        tracing::info!(
            path = %config.data_file.display(),
            "MONGODB_URI not set, serving fallback file"
        );
        return Arc::new(FileSource::new(&config.data_file));
    }

    let probe = async {
        let db = MongoDb::connect(&config.mongodb).await?;
        db.health_check().await?;
        Ok::<_, AppError>(db)
    };

    match probe.await {
        Ok(db) => {
            tracing::info!("Serving records from MongoDB");
            Arc::new(MongoSource::new(db))
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %config.data_file.display(),
                "MongoDB unavailable, serving fallback file"
            );
            Arc::new(FileSource::new(&config.data_file))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("data-service-source-{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let source = FileSource::new(temp_path());
        let err = source.fetch_all().await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.to_string().ends_with(" not found"));
        assert!(source.health_check().await.is_err());
    }

    #[tokio::test]
    async fn reads_wrapped_records() {
        let path = temp_path();
        fs::write(&path, r#"{ "data": [ {"a": 1}, {"a": 2} ] }"#)
            .await
            .unwrap();

        let source = FileSource::new(&path);
        assert_eq!(source.mode(), SourceMode::File);
        assert!(source.health_check().await.is_ok());
        let records = source.fetch_all().await.unwrap();
        assert_eq!(records, vec![json!({ "a": 1 }), json!({ "a": 2 })]);

        fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn malformed_json_is_an_internal_error() {
        let path = temp_path();
        fs::write(&path, "[{\"a\": 1},").await.unwrap();

        let err = FileSource::new(&path).fetch_all().await.unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));

        fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn absent_uri_resolves_to_file_mode() {
        let config = DataConfig::from_lookup(
            service_core::config::Config {
                port: 0,
                log_level: "info".to_string(),
            },
            |_| None,
        )
        .unwrap();

        let source = resolve_source(&config).await;
        assert_eq!(source.mode(), SourceMode::File);
    }

    #[tokio::test]
    async fn unreachable_store_falls_back_to_file_mode() {
        let config = DataConfig::from_lookup(
            service_core::config::Config {
                port: 0,
                log_level: "info".to_string(),
            },
            |key| match key {
                // Nothing listens on port 1.
                "MONGODB_URI" => Some("mongodb://127.0.0.1:1/?directConnection=true".to_string()),
                "MONGODB_CONNECT_TIMEOUT_SECS" => Some("1".to_string()),
                _ => None,
            },
        )
        .unwrap();

        let source = resolve_source(&config).await;
        assert_eq!(source.mode(), SourceMode::File);
    }

    #[tokio::test]
    async fn malformed_uri_falls_back_to_file_mode() {
        let config = DataConfig::from_lookup(
            service_core::config::Config {
                port: 0,
                log_level: "info".to_string(),
            },
            |key| (key == "MONGODB_URI").then(|| "not-a-mongo-uri".to_string()),
        )
        .unwrap();

        let source = resolve_source(&config).await;
        assert_eq!(source.mode(), SourceMode::File);
    }
}
