//! Core data models for the place pipeline.

pub mod place;
pub mod status;

pub use place::{NaturalKey, PlaceRecord, COLUMNS};
pub use status::{Availability, OpenState, PlaceStatus, StoredPlace};
