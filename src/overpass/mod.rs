//! Overpass API query building and client.

mod client;
mod query;

pub use client::{Element, OverpassClient, Position};
pub use query::{BoundingBox, OverpassQuery, TagFilter};
