//! Place record produced by the fetcher and stored by the importer.

use serde::{Deserialize, Serialize};

/// Column names of the intermediate file, in field order.
pub const COLUMNS: [&str; 7] = [
    "name",
    "address",
    "latitude",
    "longitude",
    "description",
    "category",
    "image_url",
];

/// Flat place record.
///
/// Field names are also the column names of the intermediate file and the
/// field names of the stored document, so renaming a field here changes both
/// formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub image_url: String,
}

impl PlaceRecord {
    /// Borrow the `(name, latitude, longitude)` triple used for dedup
    pub fn natural_key(&self) -> NaturalKey<'_> {
        NaturalKey {
            name: &self.name,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Natural key of a place. Coordinates compare exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NaturalKey<'a> {
    pub name: &'a str,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl std::fmt::Display for NaturalKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let coord = |c: Option<f64>| c.map_or_else(|| "-".to_string(), |v| v.to_string());
        write!(
            f,
            "{} ({}, {})",
            self.name,
            coord(self.latitude),
            coord(self.longitude)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, lat: Option<f64>, lon: Option<f64>) -> PlaceRecord {
        PlaceRecord {
            name: name.to_string(),
            address: "Phố Huế".to_string(),
            latitude: lat,
            longitude: lon,
            description: String::new(),
            category: "cafe".to_string(),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_natural_key_ignores_other_fields() {
        let a = record("Café X", Some(21.03), Some(105.85));
        let mut b = a.clone();
        b.address = "Somewhere else".to_string();
        b.category = "bar".to_string();

        assert_eq!(a.natural_key(), b.natural_key());
    }

    #[test]
    fn test_natural_key_exact_coordinates() {
        let a = record("Café X", Some(21.03), Some(105.85));
        let b = record("Café X", Some(21.030001), Some(105.85));
        assert_ne!(a.natural_key(), b.natural_key());
    }

    #[test]
    fn test_natural_key_display() {
        let a = record("Hồ Gươm", None, Some(105.85));
        assert_eq!(a.natural_key().to_string(), "Hồ Gươm (-, 105.85)");
    }
}
