//! ## Summary
//! Calendar scheduling service.
//!
//! Composes the data store's index lookups with occurrence projection and the
//! free-time engine. New events are validated against the injected [`Clock`] before
//! they reach the index; every range argument is checked for ordering before any
//! lookup runs.

mod draft;

pub use draft::{AllDayEvent, NewEvent};

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use sked_core::config::SchedulingConfig;
use sked_core::model::{Event, EventId, Interval, Person, RecurrenceRule, ensure_ordered};
use sked_core::validation::validate;
use sked_db::datastore::{DataStore, PublishOutcome};

use crate::clock::Clock;
use crate::crossing::crosses;
use crate::error::{ServiceError, ServiceResult};
use crate::freetime::{FreeTimeEngine, fitting};
use crate::recurrence::occurrences;

pub struct CalendarService {
    data: Arc<DataStore>,
    engine: FreeTimeEngine,
    clock: Arc<dyn Clock>,
    daily_horizon_days: Option<u32>,
}

impl std::fmt::Debug for CalendarService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarService")
            .field("data", &self.data)
            .field("engine", &self.engine)
            .field("daily_horizon_days", &self.daily_horizon_days)
            .finish_non_exhaustive()
    }
}

impl CalendarService {
    #[must_use]
    pub fn new(data: Arc<DataStore>, engine: FreeTimeEngine, clock: Arc<dyn Clock>) -> Self {
        Self {
            data,
            engine,
            clock,
            daily_horizon_days: None,
        }
    }

    /// ## Summary
    /// Creates a service configured from the scheduling settings.
    ///
    /// The data store should have been created with the same daily horizon.
    ///
    /// ## Errors
    /// Returns an error if the configured tolerance or slot length is invalid.
    pub fn from_config(
        data: Arc<DataStore>,
        config: &SchedulingConfig,
        clock: Arc<dyn Clock>,
    ) -> ServiceResult<Self> {
        Ok(Self {
            data,
            engine: FreeTimeEngine::from_config(config)?,
            clock,
            daily_horizon_days: config.daily_horizon_days,
        })
    }

    #[must_use]
    pub fn with_daily_horizon(mut self, days: Option<u32>) -> Self {
        self.daily_horizon_days = days;
        self
    }

    #[must_use]
    pub fn data(&self) -> &Arc<DataStore> {
        &self.data
    }

    #[must_use]
    pub fn engine(&self) -> &FreeTimeEngine {
        &self.engine
    }

    /// ## Summary
    /// Validates an event and publishes it.
    ///
    /// ## Errors
    /// Returns a validation error, leaving the index untouched, or the durable
    /// store's error.
    #[tracing::instrument(skip(self, event), fields(event_id = %event.id(), title = %event.title()))]
    pub fn add(&self, event: Event) -> ServiceResult<PublishOutcome> {
        validate(&event, self.clock.now())?;
        Ok(self.data.publish(event)?)
    }

    /// ## Summary
    /// Builds an event from its textual description, assigns a fresh id and adds it.
    ///
    /// If identical content is already published, the existing event is returned.
    ///
    /// ## Errors
    /// Returns a parse error for malformed timestamps, a validation error, or the
    /// durable store's error.
    pub fn create_event(
        &self,
        draft: NewEvent,
        attenders: impl IntoIterator<Item = Person>,
        period: impl IntoIterator<Item = RecurrenceRule>,
    ) -> ServiceResult<Event> {
        let event = draft.into_builder(attenders, period)?.build()?;
        self.add_created(event)
    }

    /// ## Summary
    /// Builds an all-day event from its textual description and adds it.
    ///
    /// ## Errors
    /// Returns a parse error for malformed days, a validation error, or the durable
    /// store's error.
    pub fn create_all_day_event(
        &self,
        draft: AllDayEvent,
        attenders: impl IntoIterator<Item = Person>,
        period: impl IntoIterator<Item = RecurrenceRule>,
    ) -> ServiceResult<Event> {
        let event = draft.into_builder(attenders, period)?.build()?;
        self.add_created(event)
    }

    fn add_created(&self, event: Event) -> ServiceResult<Event> {
        match self.add(event.clone())? {
            PublishOutcome::Duplicate(existing) => self
                .data
                .get_by_id(existing)
                .ok_or(ServiceError::InvariantViolation(
                    "duplicate event is missing from the index",
                )),
            PublishOutcome::Created(_) | PublishOutcome::Updated(_) => Ok(event),
        }
    }

    /// ## Summary
    /// Removes an event by id. Returns `None` if the id is unknown.
    ///
    /// ## Errors
    /// Returns the durable store's error; the event then stays published.
    #[tracing::instrument(skip(self))]
    pub fn remove(&self, id: EventId) -> ServiceResult<Option<Event>> {
        Ok(self.data.remove(id)?)
    }

    /// ## Summary
    /// Replaces the event stored under `event.id()` with `event`.
    ///
    /// The new content is validated first. An invalid edit, or one whose content
    /// duplicates another published event, leaves the old version in place; the
    /// latter is reported as [`PublishOutcome::Duplicate`].
    ///
    /// ## Errors
    /// Returns a validation error or the durable store's error.
    #[tracing::instrument(skip(self, event), fields(event_id = %event.id()))]
    pub fn edit(&self, event: Event) -> ServiceResult<PublishOutcome> {
        validate(&event, self.clock.now())?;
        let outcome = self.data.replace(event)?;
        tracing::info!(?outcome, "Event edited");
        Ok(outcome)
    }

    #[must_use]
    pub fn get(&self, id: EventId) -> Option<Event> {
        self.data.get_by_id(id)
    }

    #[must_use]
    #[tracing::instrument(skip(self))]
    pub fn search_by_title(&self, title: &str) -> Vec<Event> {
        let events = self.data.get_by_title(title);
        log_found(&events);
        events
    }

    #[must_use]
    #[tracing::instrument(skip(self))]
    pub fn search_by_title_prefix(&self, prefix: &str) -> Vec<Event> {
        let events = self.data.search_title_prefix(prefix);
        log_found(&events);
        events
    }

    #[must_use]
    #[tracing::instrument(skip(self))]
    pub fn search_by_day(&self, day: NaiveDate) -> Vec<Event> {
        let events = self.data.get_by_day(day);
        log_found(&events);
        events
    }

    #[must_use]
    #[tracing::instrument(skip(self), fields(attender = %person))]
    pub fn search_by_attender(&self, person: &Person) -> Vec<Event> {
        let events = self.data.get_by_attender(person);
        log_found(&events);
        events
    }

    /// ## Summary
    /// Returns the attender's events with an occurrence crossing `[start, end]`.
    ///
    /// ## Errors
    /// Returns [`sked_core::error::CoreError::InvertedRange`] if `start > end`.
    #[tracing::instrument(skip(self), fields(attender = %person))]
    pub fn search_by_attender_in_period(
        &self,
        person: &Person,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ServiceResult<Vec<Event>> {
        let window = Interval::new(start, end)?;

        let mut events = Vec::new();
        for event in self.data.get_by_attender(person) {
            if self.crosses_window(&event, window)? {
                events.push(event);
            }
        }

        log_found(&events);
        Ok(events)
    }

    /// ## Summary
    /// Returns every event occurring on any day of `[start_day, end_day]`, in natural order.
    ///
    /// ## Errors
    /// Returns [`sked_core::error::CoreError::InvertedRange`] if `start_day > end_day`.
    #[tracing::instrument(skip(self))]
    pub fn search_in_period(
        &self,
        start_day: NaiveDate,
        end_day: NaiveDate,
    ) -> ServiceResult<Vec<Event>> {
        ensure_ordered(start_day.and_time(NaiveTime::MIN), end_day.and_time(NaiveTime::MIN))?;

        let events: BTreeSet<Event> = start_day
            .iter_days()
            .take_while(|day| *day <= end_day)
            .flat_map(|day| self.data.get_by_day(day))
            .collect();

        let events: Vec<Event> = events.into_iter().collect();
        log_found(&events);
        Ok(events)
    }

    /// ## Summary
    /// Returns true if none of the attender's events crosses `[start, end]`.
    ///
    /// ## Errors
    /// Returns [`sked_core::error::CoreError::InvertedRange`] if `start > end`.
    #[tracing::instrument(skip(self), fields(attender = %person))]
    pub fn is_attender_free(
        &self,
        person: &Person,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ServiceResult<bool> {
        let free = self.search_by_attender_in_period(person, start, end)?.is_empty();
        tracing::info!(free, "Checked attender availability");
        Ok(free)
    }

    /// ## Summary
    /// Computes the free intervals of `[start, end]` against every event in the period,
    /// with the engine's tolerance.
    ///
    /// ## Errors
    /// Returns [`sked_core::error::CoreError::InvertedRange`] if `start > end`.
    #[tracing::instrument(skip(self))]
    pub fn search_free_time(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ServiceResult<Vec<Interval>> {
        let window = Interval::new(start, end)?;
        let events = self.search_in_period(start.date(), end.date())?;
        let free = self.engine.subtract(window, &self.busy_spans(&events, window)?);
        tracing::info!(count = free.len(), "Found free intervals");
        Ok(free)
    }

    /// ## Summary
    /// Computes the free intervals of `[start, end]` with the exact slot scan.
    ///
    /// ## Errors
    /// Returns [`sked_core::error::CoreError::InvertedRange`] if `start > end`.
    #[tracing::instrument(skip(self))]
    pub fn search_free_time_slots(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ServiceResult<Vec<Interval>> {
        let window = Interval::new(start, end)?;
        let events = self.search_in_period(start.date(), end.date())?;
        let free = self.engine.scan_slots(window, &self.busy_spans(&events, window)?);
        tracing::info!(count = free.len(), "Found free intervals");
        Ok(free)
    }

    /// ## Summary
    /// Returns the free intervals of `[start, end]` long enough to hold `event`.
    ///
    /// ## Errors
    /// Returns [`sked_core::error::CoreError::InvertedRange`] if `start > end`.
    #[tracing::instrument(skip(self, event), fields(title = %event.title()))]
    pub fn search_free_time_for_event(
        &self,
        event: &Event,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ServiceResult<Vec<Interval>> {
        let free = fitting(self.search_free_time(start, end)?, event.duration());
        tracing::info!(count = free.len(), "Found free intervals for event");
        Ok(free)
    }

    /// ## Summary
    /// Returns the intervals of `[start, end]` in which every attender of `event` is
    /// free and which are long enough to hold it.
    ///
    /// ## Errors
    /// Returns [`sked_core::error::CoreError::InvertedRange`] if `start > end`.
    #[tracing::instrument(skip(self, event), fields(title = %event.title(), attenders = event.attenders().len()))]
    pub fn search_free_time_for_event_with_attenders(
        &self,
        event: &Event,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ServiceResult<Vec<Interval>> {
        let window = Interval::new(start, end)?;

        let mut busy_events = BTreeSet::new();
        for attender in event.attenders() {
            busy_events.extend(self.search_by_attender_in_period(attender, start, end)?);
        }
        let busy_events: Vec<Event> = busy_events.into_iter().collect();

        let free = fitting(
            self.engine.subtract(window, &self.busy_spans(&busy_events, window)?),
            event.duration(),
        );
        tracing::info!(count = free.len(), "Found free intervals for event with attenders");
        Ok(free)
    }

    fn busy_spans(&self, events: &[Event], window: Interval) -> ServiceResult<Vec<Interval>> {
        let mut spans = Vec::new();
        for event in events {
            spans.extend(occurrences(event, window, self.daily_horizon_days)?);
        }
        tracing::debug!(count = spans.len(), "Collected busy spans");
        Ok(spans)
    }

    fn crosses_window(&self, event: &Event, window: Interval) -> ServiceResult<bool> {
        for span in occurrences(event, window, self.daily_horizon_days)? {
            if crosses(span, window.start, window.end)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn log_found(events: &[Event]) {
    if events.is_empty() {
        tracing::info!("Events not found");
    } else {
        tracing::info!(count = events.len(), "Found events");
    }
}
