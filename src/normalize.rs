//! Mapping of Overpass elements to flat place records.

use std::collections::BTreeMap;

use crate::config::MappingConfig;
use crate::models::PlaceRecord;
use crate::overpass::Element;

/// Ordered list of tag keys used to pick a category.
///
/// The first key whose value is non-empty wins, so an element tagged with
/// both `amenity` and `shop` is categorized by whichever key comes first.
#[derive(Debug, Clone)]
pub struct CategoryPriority {
    keys: Vec<String>,
}

impl CategoryPriority {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn resolve<'a>(&self, tags: &'a BTreeMap<String, String>) -> Option<&'a str> {
        first_non_empty(tags, &self.keys)
    }
}

fn first_non_empty<'a>(tags: &'a BTreeMap<String, String>, keys: &[String]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| tags.get(key))
        .map(String::as_str)
        .find(|value| !value.is_empty())
}

/// Turns elements into records using sentinel values for missing fields
#[derive(Debug, Clone)]
pub struct Normalizer {
    unknown_name: String,
    unknown_address: String,
    fallback_category: String,
    address_keys: Vec<String>,
    categories: CategoryPriority,
}

impl Normalizer {
    pub fn new(config: &MappingConfig) -> Self {
        Self {
            unknown_name: config.unknown_name.clone(),
            unknown_address: config.unknown_address.clone(),
            fallback_category: config.fallback_category.clone(),
            address_keys: config.address_keys.clone(),
            categories: CategoryPriority::new(config.category_keys.clone()),
        }
    }

    pub fn categories(&self) -> &CategoryPriority {
        &self.categories
    }

    pub fn normalize(&self, element: &Element) -> PlaceRecord {
        let tags = &element.tags;
        let (latitude, longitude) = element.coordinates();

        PlaceRecord {
            // A present but empty name tag is kept as-is
            name: tags
                .get("name")
                .cloned()
                .unwrap_or_else(|| self.unknown_name.clone()),
            address: first_non_empty(tags, &self.address_keys)
                .unwrap_or(&self.unknown_address)
                .to_string(),
            latitude,
            longitude,
            description: String::new(),
            category: self
                .categories
                .resolve(tags)
                .unwrap_or(&self.fallback_category)
                .to_string(),
            image_url: String::new(),
        }
    }

    pub fn normalize_all(&self, elements: &[Element]) -> Vec<PlaceRecord> {
        elements.iter().map(|e| self.normalize(e)).collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&MappingConfig::default())
    }
}
