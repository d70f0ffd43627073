use anyhow::{Context, Result};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_document, Document};

use super::MongoStore;
use crate::models::{PlaceStatus, StoredPlace};
use crate::store::MaintenanceStore;

fn stored_place(document: &Document) -> Result<StoredPlace> {
    let id = document
        .get_object_id("_id")
        .context("Place document without an ObjectId _id")?;

    let category = document
        .get_str("category")
        .map(str::to_lowercase)
        .ok()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "other".to_string());

    let phone = document
        .get_document("contact")
        .ok()
        .and_then(|contact| contact.get_str("phone").ok())
        .map(str::to_string);

    Ok(StoredPlace {
        id,
        name: document.get_str("name").unwrap_or_default().to_string(),
        category,
        phone,
    })
}

impl MongoStore {
    async fn find_places(&self, filter: Document) -> Result<Vec<StoredPlace>> {
        let documents: Vec<Document> = self
            .places
            .find(filter)
            .await
            .context("Place query failed")?
            .try_collect()
            .await?;

        documents.iter().map(stored_place).collect()
    }
}

impl MaintenanceStore for MongoStore {
    async fn places_in_category(&self, category: &str) -> Result<Vec<StoredPlace>> {
        self.find_places(doc! { "category": category }).await
    }

    async fn all_places(&self) -> Result<Vec<StoredPlace>> {
        self.find_places(doc! {}).await
    }

    async fn delete_place(&self, id: ObjectId) -> Result<u64> {
        let removed = self
            .statuses
            .delete_many(doc! { "place_id": id })
            .await
            .with_context(|| format!("Failed to delete statuses of place {}", id))?;

        self.places
            .delete_one(doc! { "_id": id })
            .await
            .with_context(|| format!("Failed to delete place {}", id))?;

        Ok(removed.deleted_count)
    }

    async fn has_status(&self, place_id: ObjectId) -> Result<bool> {
        let found = self
            .statuses
            .find_one(doc! { "place_id": place_id })
            .await?;
        Ok(found.is_some())
    }

    async fn insert_status(&self, status: &PlaceStatus) -> Result<()> {
        self.statuses
            .insert_one(to_document(status)?)
            .await
            .with_context(|| format!("Failed to insert status for place {}", status.place_id))?;
        Ok(())
    }
}
