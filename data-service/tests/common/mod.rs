#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use data_service::config::DataConfig;
use data_service::services::{FileSource, RecordSource};
use data_service::startup::{build_router, AppState, Application};
use service_core::config::Config as CoreConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

pub const TEST_MONGODB_URI: &str = "mongodb://localhost:27017";

/// Config built from the given variables only; the process environment is
/// never consulted.
pub fn test_config(vars: &[(&str, &str)]) -> DataConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let common = CoreConfig {
        port: 0, // Random port for testing
        log_level: "info".to_string(),
    };
    DataConfig::from_lookup(common, |key| vars.get(key).cloned())
        .expect("Failed to build test configuration")
}

/// A fresh path in the temp directory. The file is not created.
pub fn temp_data_file() -> PathBuf {
    std::env::temp_dir().join(format!("data-service-test-{}.json", Uuid::new_v4()))
}

pub async fn write_data_file(contents: &str) -> PathBuf {
    let path = temp_data_file();
    tokio::fs::write(&path, contents)
        .await
        .expect("Failed to write data file");
    path
}

pub fn file_router(path: &Path) -> Router {
    let source: Arc<dyn RecordSource> = Arc::new(FileSource::new(path));
    build_router(AppState { source })
}

/// Issue a GET against the router and decode the JSON body.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("Request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).expect("Body is not JSON");
    (status, body)
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub data_file: PathBuf,
}

impl TestApp {
    /// Run the full application in file mode against `data_file`.
    pub async fn spawn(data_file: PathBuf) -> Self {
        let config = test_config(&[("DATA_FILE", data_file.to_str().unwrap())]);

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling the root endpoint
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(&address).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            data_file,
        }
    }

    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_file(&self.data_file).await;
    }
}
