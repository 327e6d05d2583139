use crate::config::MongoConfig;
use mongodb::{
    bson::{doc, Document},
    options::ClientOptions,
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;

/// Collection holding the imported dataset.
pub const DATA_COLLECTION: &str = "data";

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    /// Build a client for `MONGODB_URI`. The driver connects lazily, so this
    /// only fails on a malformed URI; use [`MongoDb::health_check`] to probe.
    ///
    /// The database is the one named in the URI, else `config.database`.
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        let uri = config.required_uri()?;

        let mut options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::from(e)
        })?;
        options.server_selection_timeout = Some(config.connect_timeout);
        options.connect_timeout = Some(config.connect_timeout);

        let database = options
            .default_database
            .clone()
            .unwrap_or_else(|| config.database.clone());

        let client = MongoClient::with_options(options)?;
        let db = client.database(&database);
        tracing::info!(database = %database, "MongoDB client configured");
        Ok(Self { client, db })
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn records(&self) -> Collection<Document> {
        self.db.collection(DATA_COLLECTION)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
