//! ## Summary
//! Domain rules an event must satisfy before it may be indexed.
//!
//! Checks run in a fixed order so that the reported error is deterministic:
//! missing values, then empty text, then temporal logic, then recurrence consistency.

use chrono::{Datelike, NaiveDateTime};

use crate::error::ValidationError;
use crate::model::{Event, RecurrenceRule};

/// ## Summary
/// Validates an event against the domain rules, as of the instant `now`.
///
/// Pure: no side effects, the caller supplies the clock reading.
///
/// ## Errors
/// Returns the first violated rule as a [`ValidationError`].
pub fn validate(event: &Event, now: NaiveDateTime) -> Result<(), ValidationError> {
    validate_structure(event)?;

    if event.start() < now {
        return Err(ValidationError::StartInPast {
            start: event.start(),
            now,
        });
    }

    validate_recurrence(event)
}

/// ## Summary
/// Validates everything except the "start not in the past" rule.
///
/// Used when re-indexing events that were validated at publish time.
///
/// ## Errors
/// Returns the first violated rule as a [`ValidationError`].
pub fn validate_stored(event: &Event) -> Result<(), ValidationError> {
    validate_structure(event)?;
    validate_recurrence(event)
}

fn validate_structure(event: &Event) -> Result<(), ValidationError> {
    if event.period().is_empty() {
        return Err(ValidationError::MissingField("period"));
    }
    if event.title().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if event.description().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    if event.start() > event.end() {
        return Err(ValidationError::InvertedRange {
            start: event.start(),
            end: event.end(),
        });
    }
    Ok(())
}

fn validate_recurrence(event: &Event) -> Result<(), ValidationError> {
    let single_day = event.start().date() == event.end().date();

    if event.has_rule(RecurrenceRule::EveryDay) && !single_day {
        return Err(ValidationError::DaySpanMismatch(RecurrenceRule::EveryDay));
    }

    if let Some(rule) = event.weekday_rules().next() {
        if !single_day {
            return Err(ValidationError::DaySpanMismatch(rule));
        }

        let weekday = event.start().weekday();
        if !event.has_rule(RecurrenceRule::from_weekday(weekday)) {
            return Err(ValidationError::WeekdayMismatch(weekday));
        }
    }

    Ok(())
}
