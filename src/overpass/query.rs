//! Overpass QL query text.

use anyhow::{bail, Result};
use serde::Deserialize;
use std::fmt::Write;

/// Geographic bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn validate(&self) -> Result<()> {
        for lat in [self.south, self.north] {
            if !(-90.0..=90.0).contains(&lat) {
                bail!("Latitude out of range in bbox: {}", lat);
            }
        }
        for lon in [self.west, self.east] {
            if !(-180.0..=180.0).contains(&lon) {
                bail!("Longitude out of range in bbox: {}", lon);
            }
        }
        if self.south >= self.north || self.west >= self.east {
            bail!(
                "Bounding box is empty or inverted: {},{},{},{}",
                self.south,
                self.west,
                self.north,
                self.east
            );
        }
        Ok(())
    }
}

impl std::str::FromStr for BoundingBox {
    type Err = anyhow::Error;

    /// Parse `south,west,north,east`
    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()?;

        let [south, west, north, east] = parts[..] else {
            bail!("Expected south,west,north,east but got {} values", parts.len());
        };

        let bbox = Self {
            south,
            west,
            north,
            east,
        };
        bbox.validate()?;
        Ok(bbox)
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

/// Tag filter for a node statement.
///
/// No values matches any value of `key`, one value is an exact match and
/// several values become a regex alternation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TagFilter {
    pub key: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl TagFilter {
    fn selector(&self) -> String {
        match self.values.as_slice() {
            [] => format!("[\"{}\"]", self.key),
            [value] => format!("[\"{}\"=\"{}\"]", self.key, value),
            values => format!("[\"{}\"~\"{}\"]", self.key, values.join("|")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OverpassQuery {
    pub bbox: BoundingBox,
    pub filters: Vec<TagFilter>,
    /// Server-side timeout in seconds
    pub timeout: u32,
}

impl OverpassQuery {
    pub fn render(&self) -> String {
        let mut query = format!("[out:json][timeout:{}];\n(\n", self.timeout);
        for filter in &self.filters {
            // Writing into a String cannot fail
            let _ = writeln!(query, "  node{}({});", filter.selector(), self.bbox);
        }
        query.push_str(");\nout body;\n");
        query
    }
}
