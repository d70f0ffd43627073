//! In-memory store for exercising the import and maintenance loops.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use mongodb::bson::oid::ObjectId;

use super::{MaintenanceStore, PlaceStore};
use crate::models::{NaturalKey, PlaceRecord, PlaceStatus, StoredPlace};

#[derive(Default)]
pub struct MemoryStore {
    places: Mutex<Vec<(ObjectId, PlaceRecord)>>,
    statuses: Mutex<Vec<PlaceStatus>>,
    operations: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_places(records: &[PlaceRecord]) -> Self {
        let store = Self::new();
        {
            let mut places = store.places.lock().unwrap();
            for record in records {
                places.push((ObjectId::new(), record.clone()));
            }
        }
        store
    }

    /// Number of calls made through either trait
    pub fn operations(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<PlaceRecord> {
        self.places
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn count_key(&self, key: &NaturalKey<'_>) -> usize {
        self.places
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, r)| r.natural_key() == *key)
            .count()
    }

    pub fn statuses(&self) -> Vec<PlaceStatus> {
        self.statuses.lock().unwrap().clone()
    }

    fn tick(&self) {
        self.operations.fetch_add(1, Ordering::SeqCst);
    }

    fn stored(id: ObjectId, record: &PlaceRecord) -> StoredPlace {
        let category = record.category.to_lowercase();
        StoredPlace {
            id,
            name: record.name.clone(),
            category: if category.is_empty() {
                "other".to_string()
            } else {
                category
            },
            phone: None,
        }
    }
}

impl PlaceStore for MemoryStore {
    async fn exists(&self, key: &NaturalKey<'_>) -> Result<bool> {
        self.tick();
        Ok(self.count_key(key) > 0)
    }

    async fn insert(&self, record: &PlaceRecord) -> Result<()> {
        self.tick();
        self.places
            .lock()
            .unwrap()
            .push((ObjectId::new(), record.clone()));
        Ok(())
    }

    async fn insert_if_absent(&self, record: &PlaceRecord) -> Result<bool> {
        self.tick();
        let mut places = self.places.lock().unwrap();
        if places
            .iter()
            .any(|(_, r)| r.natural_key() == record.natural_key())
        {
            return Ok(false);
        }
        places.push((ObjectId::new(), record.clone()));
        Ok(true)
    }

    async fn ensure_natural_key_index(&self) -> Result<()> {
        self.tick();
        Ok(())
    }
}

impl MaintenanceStore for MemoryStore {
    async fn places_in_category(&self, category: &str) -> Result<Vec<StoredPlace>> {
        self.tick();
        Ok(self
            .places
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, r)| r.category == category)
            .map(|(id, r)| Self::stored(*id, r))
            .collect())
    }

    async fn all_places(&self) -> Result<Vec<StoredPlace>> {
        self.tick();
        Ok(self
            .places
            .lock()
            .unwrap()
            .iter()
            .map(|(id, r)| Self::stored(*id, r))
            .collect())
    }

    async fn delete_place(&self, id: ObjectId) -> Result<u64> {
        self.tick();
        let mut statuses = self.statuses.lock().unwrap();
        let before = statuses.len();
        statuses.retain(|s| s.place_id != id);
        let removed = (before - statuses.len()) as u64;

        self.places.lock().unwrap().retain(|(pid, _)| *pid != id);
        Ok(removed)
    }

    async fn has_status(&self, place_id: ObjectId) -> Result<bool> {
        self.tick();
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .iter()
            .any(|s| s.place_id == place_id))
    }

    async fn insert_status(&self, status: &PlaceStatus) -> Result<()> {
        self.tick();
        self.statuses.lock().unwrap().push(status.clone());
        Ok(())
    }
}
