//! In-memory event index and durable event storage.

pub mod datastore;
pub mod error;
pub mod index;
pub mod store;
