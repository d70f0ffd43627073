//! TOML configuration shared by the binaries.
//!
//! Every section is optional; an empty file yields the built-in defaults,
//! which describe central Hanoi and a local MongoDB.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::importer::DedupStrategy;
use crate::overpass::{BoundingBox, TagFilter};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub overpass: OverpassConfig,
    pub mapping: MappingConfig,
    pub output: OutputConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OverpassConfig {
    pub endpoint: String,
    /// Server-side query timeout in seconds
    pub timeout: u32,
    pub bbox: BoundingBox,
    pub filters: Vec<TagFilter>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MappingConfig {
    pub unknown_name: String,
    pub unknown_address: String,
    pub fallback_category: String,
    pub address_keys: Vec<String>,
    /// Checked in order; the first tag with a non-empty value is the category
    pub category_keys: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub uri: String,
    pub name: String,
    pub collection: String,
    pub status_collection: String,
    pub strategy: DedupStrategy,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://overpass-api.de/api/interpreter".to_string(),
            timeout: 50,
            bbox: BoundingBox {
                south: 21.0,
                west: 105.75,
                north: 21.2,
                east: 105.95,
            },
            filters: default_filters(),
        }
    }
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            unknown_name: "Không rõ tên".to_string(),
            unknown_address: "Không rõ địa chỉ".to_string(),
            fallback_category: "other".to_string(),
            address_keys: strings(&["addr:full", "addr:street"]),
            category_keys: strings(&[
                "amenity",
                "shop",
                "tourism",
                "leisure",
                "sport",
                "natural",
                "historic",
                "healthcare",
                "highway",
                "railway",
                "building",
            ]),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("hanoi_places.xlsx"),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://mongo:27017/".to_string(),
            name: "travel_review_app".to_string(),
            collection: "places".to_string(),
            status_collection: "placestatuses".to_string(),
            strategy: DedupStrategy::default(),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Node filters queried by default: (tag key, accepted values; empty = any)
const DEFAULT_FILTERS: &[(&str, &[&str])] = &[
    ("amenity", &["restaurant", "cafe", "fast_food", "bar", "pub"]),
    ("amenity", &["marketplace"]),
    ("amenity", &["school", "university", "college", "kindergarten"]),
    ("shop", &["supermarket", "convenience", "mall"]),
    ("tourism", &["attraction", "museum", "viewpoint", "gallery"]),
    ("tourism", &["hotel", "motel", "guest_house", "hostel"]),
    ("leisure", &["park"]),
    ("leisure", &["playground", "amusement_ride"]),
    ("sport", &[]),
    ("natural", &["water"]),
    ("water", &["lake"]),
    ("historic", &[]),
    ("healthcare", &["hospital", "clinic"]),
    ("highway", &["bus_stop"]),
    ("railway", &["station"]),
    ("building", &["temple", "pagoda", "church"]),
];

fn default_filters() -> Vec<TagFilter> {
    DEFAULT_FILTERS
        .iter()
        .map(|(key, values)| TagFilter {
            key: key.to_string(),
            values: strings(values),
        })
        .collect()
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.overpass.endpoint)
            .with_context(|| format!("Invalid overpass.endpoint: {}", self.overpass.endpoint))?;
        self.overpass.bbox.validate()?;

        if self.overpass.filters.is_empty() {
            bail!("overpass.filters must not be empty");
        }
        if let Some(filter) = self.overpass.filters.iter().find(|f| f.key.trim().is_empty()) {
            bail!("overpass.filters contains an empty key (values: {:?})", filter.values);
        }
        if self.mapping.category_keys.is_empty() {
            bail!("mapping.category_keys must not be empty");
        }
        if self.database.collection.is_empty() || self.database.name.is_empty() {
            bail!("database.name and database.collection must not be empty");
        }

        Ok(())
    }
}
