use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Interval, Person, RecurrenceRule};
use crate::error::ValidationError;

/// Opaque identifier of a stored event.
pub type EventId = Uuid;

/// An immutable calendar event.
///
/// Stored events are identified by `id` alone: `PartialEq` and `Hash` only look at
/// the id. Use [`Event::same_content`] to detect structurally identical events
/// published under different ids.
///
/// The natural order is `(start, end, title, description)`, with the id as the
/// last tie-break so that the order agrees with equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    title: String,
    description: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
    attenders: BTreeSet<Person>,
    period: BTreeSet<RecurrenceRule>,
}

impl Event {
    #[must_use]
    pub fn builder() -> EventBuilder {
        EventBuilder::default()
    }

    /// Returns a builder pre-filled with this event's fields.
    #[must_use]
    pub fn to_builder(&self) -> EventBuilder {
        EventBuilder {
            id: Some(self.id),
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            start: Some(self.start),
            end: Some(self.end),
            attenders: Some(self.attenders.clone()),
            period: Some(self.period.clone()),
        }
    }

    #[must_use]
    pub fn id(&self) -> EventId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    #[must_use]
    pub fn attenders(&self) -> &BTreeSet<Person> {
        &self.attenders
    }

    #[must_use]
    pub fn period(&self) -> &BTreeSet<RecurrenceRule> {
        &self.period
    }

    #[must_use]
    pub fn span(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    #[must_use]
    pub fn has_rule(&self, rule: RecurrenceRule) -> bool {
        self.period.contains(&rule)
    }

    pub fn weekday_rules(&self) -> impl Iterator<Item = RecurrenceRule> + '_ {
        self.period.iter().copied().filter(|rule| rule.is_weekday())
    }

    /// Every calendar day from the start day to the end day, inclusive.
    pub fn spanned_days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.end.date();
        self.start.date().iter_days().take_while(move |day| *day <= last)
    }

    #[must_use]
    pub fn is_attended_by(&self, person: &Person) -> bool {
        self.attenders.contains(person)
    }

    /// Full-field equality ignoring the id, used for duplicate detection.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.title == other.title
            && self.description == other.description
            && self.start == other.start
            && self.end == other.end
            && self.attenders == other.attenders
            && self.period == other.period
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Event {}

impl std::hash::Hash for Event {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
            .then_with(|| self.title.cmp(&other.title))
            .then_with(|| self.description.cmp(&other.description))
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} '{}' {} .. {}",
            self.id, self.title, self.start, self.end
        )
    }
}

/// Step-by-step construction of an [`Event`].
///
/// `build` only checks that every field was provided; domain rules are checked
/// by [`crate::validation::validate`].
#[derive(Debug, Clone, Default)]
pub struct EventBuilder {
    id: Option<EventId>,
    title: Option<String>,
    description: Option<String>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    attenders: Option<BTreeSet<Person>>,
    period: Option<BTreeSet<RecurrenceRule>>,
}

impl EventBuilder {
    #[must_use]
    pub fn id(mut self, id: EventId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn start(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub fn end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    #[must_use]
    pub fn attenders(mut self, attenders: impl IntoIterator<Item = Person>) -> Self {
        self.attenders = Some(attenders.into_iter().collect());
        self
    }

    #[must_use]
    pub fn period(mut self, period: impl IntoIterator<Item = RecurrenceRule>) -> Self {
        self.period = Some(period.into_iter().collect());
        self
    }

    /// ## Summary
    /// Assembles the event.
    ///
    /// ## Errors
    /// Returns [`ValidationError::MissingField`] naming the first field that was
    /// never set, checked in declaration order.
    pub fn build(self) -> Result<Event, ValidationError> {
        Ok(Event {
            id: self.id.ok_or(ValidationError::MissingField("id"))?,
            title: self.title.ok_or(ValidationError::MissingField("title"))?,
            description: self
                .description
                .ok_or(ValidationError::MissingField("description"))?,
            start: self.start.ok_or(ValidationError::MissingField("start date"))?,
            end: self.end.ok_or(ValidationError::MissingField("end date"))?,
            attenders: self
                .attenders
                .ok_or(ValidationError::MissingField("attenders"))?,
            period: self.period.ok_or(ValidationError::MissingField("period"))?,
        })
    }
}
