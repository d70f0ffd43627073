//! Storage seams used by the importer and the maintenance tasks.

#[cfg(test)]
pub mod memory;

use anyhow::Result;
use mongodb::bson::oid::ObjectId;

use crate::models::{NaturalKey, PlaceRecord, PlaceStatus, StoredPlace};

/// Place collection operations needed by the import loop
#[allow(async_fn_in_trait)]
pub trait PlaceStore {
    /// Whether a document matching all three key fields exists
    async fn exists(&self, key: &NaturalKey<'_>) -> Result<bool>;

    /// Insert unconditionally
    async fn insert(&self, record: &PlaceRecord) -> Result<()>;

    /// Insert only when no document has the same natural key, atomically.
    /// Returns whether a document was created.
    async fn insert_if_absent(&self, record: &PlaceRecord) -> Result<bool>;

    /// Create the unique index that backs `insert_if_absent`
    async fn ensure_natural_key_index(&self) -> Result<()>;
}

/// Operations used by the prune and status seeding tasks
#[allow(async_fn_in_trait)]
pub trait MaintenanceStore {
    async fn places_in_category(&self, category: &str) -> Result<Vec<StoredPlace>>;

    async fn all_places(&self) -> Result<Vec<StoredPlace>>;

    /// Delete a place and its status documents, returning the number of
    /// statuses removed
    async fn delete_place(&self, id: ObjectId) -> Result<u64>;

    async fn has_status(&self, place_id: ObjectId) -> Result<bool>;

    async fn insert_status(&self, status: &PlaceStatus) -> Result<()>;
}
