use anyhow::{Context, Result};
use mongodb::bson::{doc, to_document, Document};
use mongodb::error::{Error, ErrorKind, WriteFailure};
use tracing::debug;

use super::MongoStore;
use crate::models::{NaturalKey, PlaceRecord};
use crate::store::PlaceStore;

const DUPLICATE_KEY: i32 = 11000;

fn key_filter(key: &NaturalKey<'_>) -> Document {
    // An absent coordinate is stored as null, and `null` also matches it
    doc! {
        "name": key.name,
        "latitude": key.latitude,
        "longitude": key.longitude,
    }
}

fn is_duplicate_key(err: &Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

impl PlaceStore for MongoStore {
    async fn exists(&self, key: &NaturalKey<'_>) -> Result<bool> {
        let found = self
            .places
            .find_one(key_filter(key))
            .await
            .with_context(|| format!("Lookup failed for {}", key))?;
        Ok(found.is_some())
    }

    async fn insert(&self, record: &PlaceRecord) -> Result<()> {
        let document = to_document(record)?;
        self.places
            .insert_one(document)
            .await
            .with_context(|| format!("Insert failed for {}", record.natural_key()))?;
        Ok(())
    }

    async fn insert_if_absent(&self, record: &PlaceRecord) -> Result<bool> {
        let key = record.natural_key();

        // Key fields come from the filter on insert
        let mut fields = to_document(record)?;
        for field in ["name", "latitude", "longitude"] {
            fields.remove(field);
        }

        let result = self
            .places
            .update_one(key_filter(&key), doc! { "$setOnInsert": fields })
            .upsert(true)
            .await;

        match result {
            Ok(update) => Ok(update.upserted_id.is_some()),
            Err(e) if is_duplicate_key(&e) => {
                debug!("Concurrent insert won for {}", key);
                Ok(false)
            }
            Err(e) => Err(e).with_context(|| format!("Upsert failed for {}", key)),
        }
    }

    async fn ensure_natural_key_index(&self) -> Result<()> {
        self.create_natural_key_index().await
    }
}
