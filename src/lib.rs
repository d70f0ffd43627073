//! Placesync - fetch points of interest from Overpass and import them into MongoDB
//!
//! This library provides shared types and modules for the fetch, import and
//! maintain binaries.

pub mod config;
pub mod importer;
pub mod maintenance;
pub mod models;
pub mod mongo;
pub mod normalize;
pub mod overpass;
pub mod store;
pub mod table;

pub use config::Config;
pub use models::{NaturalKey, PlaceRecord};
