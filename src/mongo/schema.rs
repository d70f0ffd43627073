//! Index management for the place collection.

use anyhow::{Context, Result};
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::IndexModel;
use tracing::info;

use super::MongoStore;

const NATURAL_KEY_INDEX: &str = "name_latitude_longitude_unique";

impl MongoStore {
    /// Create the unique `(name, latitude, longitude)` index if missing.
    ///
    /// Fails when the collection already holds duplicate keys.
    pub async fn create_natural_key_index(&self) -> Result<()> {
        let model = IndexModel::builder()
            .keys(doc! { "name": 1, "latitude": 1, "longitude": 1 })
            .options(
                IndexOptions::builder()
                    .name(NATURAL_KEY_INDEX.to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.places
            .create_index(model)
            .await
            .context("Failed to create natural key index (duplicate places already stored?)")?;

        info!("Index {} ready on {}", NATURAL_KEY_INDEX, self.collection);
        Ok(())
    }
}
