use chrono::TimeDelta;
use uuid::Uuid;

use sked_core::error::CoreResult;
use sked_core::model::{Event, EventBuilder, Person, RecurrenceRule};
use sked_core::util::date::{parse_date_time, parse_start_of_day};

/// Textual description of a new event, with timestamps as `yyyy-MM-dd HH:mm`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub start: String,
    pub end: String,
}

impl NewEvent {
    /// ## Summary
    /// Parses the timestamps and returns a builder carrying a fresh id.
    ///
    /// ## Errors
    /// Returns [`sked_core::error::CoreError::ParseError`] if a timestamp is malformed.
    pub fn into_builder(
        self,
        attenders: impl IntoIterator<Item = Person>,
        period: impl IntoIterator<Item = RecurrenceRule>,
    ) -> CoreResult<EventBuilder> {
        Ok(Event::builder()
            .id(Uuid::new_v4())
            .title(self.title)
            .description(self.description)
            .start(parse_date_time(&self.start)?)
            .end(parse_date_time(&self.end)?)
            .attenders(attenders)
            .period(period))
    }
}

/// Textual description of an all-day event, with days as `yyyy-MM-dd`.
///
/// The event runs from midnight of `start_day` to midnight after `end_day`, or after
/// `start_day` when no end day is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllDayEvent {
    pub title: String,
    pub description: String,
    pub start_day: String,
    pub end_day: Option<String>,
}

impl AllDayEvent {
    /// ## Summary
    /// Parses the days and returns a builder carrying a fresh id.
    ///
    /// ## Errors
    /// Returns [`sked_core::error::CoreError::ParseError`] if a day is malformed.
    pub fn into_builder(
        self,
        attenders: impl IntoIterator<Item = Person>,
        period: impl IntoIterator<Item = RecurrenceRule>,
    ) -> CoreResult<EventBuilder> {
        let start = parse_start_of_day(&self.start_day)?;
        let last_day = match &self.end_day {
            Some(day) => parse_start_of_day(day)?,
            None => start,
        };

        Ok(Event::builder()
            .id(Uuid::new_v4())
            .title(self.title)
            .description(self.description)
            .start(start)
            .end(last_day + TimeDelta::days(1))
            .attenders(attenders)
            .period(period))
    }
}
