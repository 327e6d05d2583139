use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATABASE: &str = "blackcoffer_db";
pub const DEFAULT_DATA_FILE: &str = "jsondata.json";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct DataConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    /// Fallback file served when the store is not in use.
    pub data_file: PathBuf,
    /// Input file for the importer.
    pub import_file: PathBuf,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// `None` when `MONGODB_URI` is unset or empty.
    pub uri: Option<String>,
    /// Used only when the URI does not name a default database.
    pub database: String,
    pub connect_timeout: Duration,
}

impl DataConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let connect_timeout_secs = get(
            "MONGODB_CONNECT_TIMEOUT_SECS",
            &DEFAULT_CONNECT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "MONGODB_CONNECT_TIMEOUT_SECS must be a whole number of seconds: {}",
                e
            ))
        })?;

        Ok(DataConfig {
            common,
            mongodb: MongoConfig {
                uri: lookup("MONGODB_URI").filter(|v| !v.trim().is_empty()),
                database: get("MONGODB_DATABASE", DEFAULT_DATABASE),
                connect_timeout: Duration::from_secs(connect_timeout_secs),
            },
            data_file: PathBuf::from(get("DATA_FILE", DEFAULT_DATA_FILE)),
            import_file: PathBuf::from(get("IMPORT_FILE", DEFAULT_DATA_FILE)),
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|v| !v.trim().is_empty()),
        })
    }
}

impl MongoConfig {
    /// The connection string, for callers that cannot run without a store.
    pub fn required_uri(&self) -> Result<&str, AppError> {
        self.uri.as_deref().ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!("MONGODB_URI is required but not set"))
        })
    }
}
