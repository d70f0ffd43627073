//! MongoDB client wrapper.

use anyhow::{Context, Result};
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection};
use tracing::info;

use crate::config::DatabaseConfig;

/// Connection plus the place and status collections
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    pub(super) places: Collection<Document>,
    pub(super) statuses: Collection<Document>,
    pub database: String,
    pub collection: String,
}

impl MongoStore {
    /// Connect and verify the server answers a ping
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to MongoDB at {}...", config.uri);
        let client = Client::with_uri_str(&config.uri)
            .await
            .context("Invalid MongoDB connection string")?;

        let db = client.database(&config.name);
        let store = Self {
            places: db.collection(&config.collection),
            statuses: db.collection(&config.status_collection),
            client,
            database: config.name.clone(),
            collection: config.collection.clone(),
        };

        store
            .health_check()
            .await
            .context("Failed to connect to MongoDB")?;

        Ok(store)
    }

    pub async fn health_check(&self) -> Result<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    /// Number of documents in the place collection
    pub async fn doc_count(&self) -> Result<u64> {
        Ok(self.places.count_documents(doc! {}).await?)
    }

    /// Close the connection pool
    pub async fn close(self) {
        self.client.shutdown().await;
    }
}
