//! ## Summary
//! The shared event data store: the recurrence index behind a single lock, mirrored
//! to a durable [`EventStore`].
//!
//! `publish`, `replace` and `remove` hold the write lock for the whole multi-index update and the
//! durable write, so readers never observe a half-applied change. A failed durable
//! write is undone in the index before the error is returned.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;

use sked_core::model::{Event, EventId, Person};
use sked_core::validation::validate_stored;

use crate::error::DbResult;
use crate::index::{IndexStats, InsertOutcome, RecurrenceIndex};
use crate::store::EventStore;

/// Result of [`DataStore::publish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A new event was indexed and stored.
    Created(EventId),
    /// An event with the same id was replaced.
    Updated(EventId),
    /// Identical content is already published under the carried id; nothing changed.
    Duplicate(EventId),
}

impl PublishOutcome {
    /// Id of the event that holds the published content.
    #[must_use]
    pub fn id(self) -> EventId {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Duplicate(id) => id,
        }
    }
}

pub struct DataStore {
    index: RwLock<RecurrenceIndex>,
    store: Arc<dyn EventStore>,
}

impl std::fmt::Debug for DataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl DataStore {
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self::with_daily_horizon(store, None)
    }

    /// Creates a data store whose `EVERY_DAY` events stop recurring `days` days after their anchor.
    #[must_use]
    pub fn with_daily_horizon(store: Arc<dyn EventStore>, days: Option<u32>) -> Self {
        Self {
            index: RwLock::new(RecurrenceIndex::new().with_daily_horizon(days)),
            store,
        }
    }

    /// ## Summary
    /// Indexes an event and writes it to the durable store.
    ///
    /// Content identical to an already published event is ignored and reported as
    /// [`PublishOutcome::Duplicate`]. The caller is responsible for validation.
    ///
    /// ## Errors
    /// Returns the durable store's error unchanged; the index is restored to its
    /// state before the call.
    #[tracing::instrument(skip(self, event), fields(event_id = %event.id(), title = %event.title()))]
    pub fn publish(&self, event: Event) -> DbResult<PublishOutcome> {
        let mut index = self.write_index();
        let id = event.id();
        let stored = event.clone();

        let outcome = index.insert(event);
        let previous = match outcome {
            InsertOutcome::Duplicate(existing) => {
                tracing::warn!(existing_id = %existing, "Event with the same content is already published");
                return Ok(PublishOutcome::Duplicate(existing));
            }
            InsertOutcome::Inserted => None,
            InsertOutcome::Replaced(old) => Some(old),
        };

        if let Err(err) = self.store.write(&stored) {
            tracing::error!(error = %err, "Failed to store event, rolling back index");
            index.remove(id);
            if let Some(old) = previous {
                index.insert(old);
            }
            return Err(err);
        }

        if previous.is_some() {
            tracing::info!("Event updated");
            Ok(PublishOutcome::Updated(id))
        } else {
            tracing::info!("Event published");
            Ok(PublishOutcome::Created(id))
        }
    }

    /// ## Summary
    /// Swaps the event stored under `event.id()` for `event` in one step.
    ///
    /// The old version is retracted before the duplicate check, so an edit never
    /// collides with itself. If the new content duplicates another published event,
    /// the old version is put back and [`PublishOutcome::Duplicate`] is returned. An
    /// unknown id behaves like [`DataStore::publish`].
    ///
    /// ## Errors
    /// Returns the durable store's error unchanged; the old version stays published.
    #[tracing::instrument(skip(self, event), fields(event_id = %event.id(), title = %event.title()))]
    pub fn replace(&self, event: Event) -> DbResult<PublishOutcome> {
        let mut index = self.write_index();
        let id = event.id();
        let stored = event.clone();
        let previous = index.remove(id);

        match index.insert(event) {
            InsertOutcome::Duplicate(existing) => {
                tracing::warn!(existing_id = %existing, "Edited content is already published, keeping old version");
                if let Some(old) = previous {
                    index.insert(old);
                }
                return Ok(PublishOutcome::Duplicate(existing));
            }
            InsertOutcome::Inserted | InsertOutcome::Replaced(_) => {}
        }

        if let Err(err) = self.store.write(&stored) {
            tracing::error!(error = %err, "Failed to store edited event, restoring old version");
            index.remove(id);
            if let Some(old) = previous {
                index.insert(old);
            }
            return Err(err);
        }

        if previous.is_some() {
            tracing::info!("Event replaced");
            Ok(PublishOutcome::Updated(id))
        } else {
            tracing::info!("Event published");
            Ok(PublishOutcome::Created(id))
        }
    }

    /// ## Summary
    /// Removes an event from every index and deletes its durable copy.
    ///
    /// Returns `Ok(None)` without touching the durable store if the id is unknown.
    ///
    /// ## Errors
    /// Returns the durable store's error unchanged; the event stays indexed.
    #[tracing::instrument(skip(self), fields(event_id = %id))]
    pub fn remove(&self, id: EventId) -> DbResult<Option<Event>> {
        let mut index = self.write_index();
        let Some(event) = index.remove(id) else {
            tracing::debug!("Event not found, nothing to remove");
            return Ok(None);
        };

        match self.store.delete(id) {
            Ok(existed) => {
                if !existed {
                    tracing::warn!("Removed event had no durable copy");
                }
                tracing::info!("Event removed");
                Ok(Some(event))
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to delete stored event, restoring index");
                index.insert(event);
                Err(err)
            }
        }
    }

    /// ## Summary
    /// Rebuilds the index from the durable store.
    ///
    /// Stored events are checked with [`validate_stored`]; events breaking a rule are
    /// skipped with a warning. Returns the number of events indexed.
    ///
    /// ## Errors
    /// Returns an error if the durable store cannot be listed.
    #[tracing::instrument(skip(self))]
    pub fn rehydrate(&self) -> DbResult<usize> {
        let events = self.store.read_all()?;
        let mut index = self.write_index();
        let mut indexed = 0;

        for event in events {
            if let Err(err) = validate_stored(&event) {
                tracing::warn!(event_id = %event.id(), error = %err, "Skipping invalid stored event");
                continue;
            }
            if let InsertOutcome::Duplicate(existing) = index.insert(event) {
                tracing::warn!(existing_id = %existing, "Skipping stored duplicate");
                continue;
            }
            indexed += 1;
        }

        tracing::info!(count = indexed, "Index rehydrated");
        Ok(indexed)
    }

    #[must_use]
    pub fn get_by_id(&self, id: EventId) -> Option<Event> {
        self.read_index().get(id).cloned()
    }

    #[must_use]
    pub fn get_by_title(&self, title: &str) -> Vec<Event> {
        owned(self.read_index().get_by_title(title))
    }

    #[must_use]
    pub fn get_by_attender(&self, person: &Person) -> Vec<Event> {
        owned(self.read_index().get_by_attender(person))
    }

    #[must_use]
    pub fn search_title_prefix(&self, prefix: &str) -> Vec<Event> {
        owned(self.read_index().search_title_prefix(prefix))
    }

    #[must_use]
    pub fn get_by_day(&self, day: NaiveDate) -> Vec<Event> {
        owned(self.read_index().get_by_day(day))
    }

    /// Snapshot of every published event in natural order.
    #[must_use]
    pub fn all(&self) -> Vec<Event> {
        owned(self.read_index().all())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read_index().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_index().is_empty()
    }

    #[must_use]
    pub fn is_referenced(&self, id: EventId) -> bool {
        self.read_index().is_referenced(id)
    }

    #[must_use]
    pub fn stats(&self) -> IndexStats {
        self.read_index().stats()
    }

    /// Acquires the read lock, recovering from poisoning.
    fn read_index(&self) -> RwLockReadGuard<'_, RecurrenceIndex> {
        match self.index.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                self.index.clear_poison();
                poisoned.into_inner()
            }
        }
    }

    /// Acquires the write lock, recovering from poisoning.
    fn write_index(&self) -> RwLockWriteGuard<'_, RecurrenceIndex> {
        match self.index.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                self.index.clear_poison();
                poisoned.into_inner()
            }
        }
    }
}

fn owned(events: Vec<&Event>) -> Vec<Event> {
    events.into_iter().cloned().collect()
}
