//! Durable copies of published events.
//!
//! ## Summary
//! The index lives in memory; an [`EventStore`] keeps a durable copy that is read
//! back once at startup. Implementations must round-trip every event field,
//! including the attender set and the recurrence rules.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use sked_core::model::{Event, EventId};

use crate::error::DbResult;

pub trait EventStore: Send + Sync {
    /// ## Summary
    /// Persists one event, overwriting any stored version with the same id.
    ///
    /// ## Errors
    /// Returns an error if the event cannot be written.
    fn write(&self, event: &Event) -> DbResult<()>;

    /// ## Summary
    /// Reads one event, or `None` if no event is stored under `id`.
    ///
    /// ## Errors
    /// Returns an error if a stored document exists but cannot be read.
    fn read(&self, id: EventId) -> DbResult<Option<Event>>;

    /// ## Summary
    /// Reads every stored event.
    ///
    /// ## Errors
    /// Returns an error if the store itself cannot be listed.
    fn read_all(&self) -> DbResult<Vec<Event>>;

    /// ## Summary
    /// Deletes the stored copy of an event. Returns `false` if none existed.
    ///
    /// ## Errors
    /// Returns an error if an existing copy cannot be deleted.
    fn delete(&self, id: EventId) -> DbResult<bool>;
}
