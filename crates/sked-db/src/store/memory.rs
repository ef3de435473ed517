use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use sked_core::model::{Event, EventId};

use super::EventStore;
use crate::error::DbResult;

/// Event store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: Mutex<BTreeMap<EventId, Event>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: Mutex::new(events.into_iter().map(|event| (event.id(), event)).collect()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Locks the map and recovers from poisoning.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<EventId, Event>> {
        match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                self.events.clear_poison();
                poisoned.into_inner()
            }
        }
    }
}

impl EventStore for MemoryStore {
    fn write(&self, event: &Event) -> DbResult<()> {
        self.lock().insert(event.id(), event.clone());
        Ok(())
    }

    fn read(&self, id: EventId) -> DbResult<Option<Event>> {
        Ok(self.lock().get(&id).cloned())
    }

    fn read_all(&self) -> DbResult<Vec<Event>> {
        Ok(self.lock().values().cloned().collect())
    }

    fn delete(&self, id: EventId) -> DbResult<bool> {
        Ok(self.lock().remove(&id).is_some())
    }
}
