//! Per-place status documents seeded after an import.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Categories that get lodging defaults (price and room count)
const LODGING: [&str; 5] = ["hotel", "motel", "resort", "guest_house", "hostel"];

const LODGING_PRICE: f64 = 500_000.0;
const LODGING_ROOMS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenState {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Unavailable,
}

/// A place as read back from the database for maintenance
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPlace {
    pub id: ObjectId,
    pub name: String,
    /// Lower-cased, `"other"` when the document has none
    pub category: String,
    pub phone: Option<String>,
}

/// Status document stored alongside each place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceStatus {
    pub place_id: ObjectId,
    pub initial_status: OpenState,
    pub opening_time: String,
    pub closing_time: String,
    pub available_status: Availability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_rooms: Option<u32>,
    pub price: f64,
    pub contact: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime,
}

impl PlaceStatus {
    /// Default status for a place, priced by category group
    pub fn defaults_for(place: &StoredPlace) -> Self {
        let lodging = is_lodging(&place.category);
        let now = DateTime::now();

        Self {
            place_id: place.id,
            initial_status: OpenState::Open,
            opening_time: "00:00".to_string(),
            closing_time: "23:59".to_string(),
            available_status: Availability::Available,
            available_rooms: lodging.then_some(LODGING_ROOMS),
            price: if lodging { LODGING_PRICE } else { 0.0 },
            contact: place.phone.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

pub fn is_lodging(category: &str) -> bool {
    LODGING.contains(&category)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(category: &str) -> StoredPlace {
        StoredPlace {
            id: ObjectId::new(),
            name: "Somewhere".to_string(),
            category: category.to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_lodging_defaults() {
        let status = PlaceStatus::defaults_for(&place("hotel"));
        assert_eq!(status.price, 500_000.0);
        assert_eq!(status.available_rooms, Some(10));
        assert_eq!(status.initial_status, OpenState::Open);
    }

    #[test]
    fn test_other_defaults() {
        for category in ["cafe", "attraction", "park", "other"] {
            let status = PlaceStatus::defaults_for(&place(category));
            assert_eq!(status.price, 0.0);
            assert_eq!(status.available_rooms, None);
            assert_eq!(status.opening_time, "00:00");
            assert_eq!(status.closing_time, "23:59");
        }
    }

    #[test]
    fn test_contact_from_phone() {
        let mut p = place("bar");
        p.phone = Some("+84 24 0000 0000".to_string());
        let status = PlaceStatus::defaults_for(&p);
        assert_eq!(status.contact, "+84 24 0000 0000");
        assert_eq!(status.place_id, p.id);
    }

    #[test]
    fn test_serialized_field_names() {
        let status = PlaceStatus::defaults_for(&place("cafe"));
        let doc = mongodb::bson::to_document(&status).unwrap();
        assert_eq!(doc.get_str("initial_status").unwrap(), "open");
        assert_eq!(doc.get_str("available_status").unwrap(), "available");
        assert!(doc.contains_key("createdAt"));
        assert!(!doc.contains_key("available_rooms"));
    }
}
