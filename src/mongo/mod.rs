//! MongoDB client and store implementations.

mod client;
mod places;
mod schema;
mod statuses;

pub use client::MongoStore;
