use chrono::{NaiveDateTime, Weekday};
use thiserror::Error;

use crate::model::RecurrenceRule;

/// Core-level errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Inverted range: start {start} is after end {end}")]
    InvertedRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// A well-formed event that breaks a domain rule.
///
/// Variants are listed in the order the validator checks them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing value of {0} of event")]
    MissingField(&'static str),

    #[error("Not specified event title")]
    EmptyTitle,

    #[error("Not specified event description")]
    EmptyDescription,

    #[error("Start date {start} is after end date {end}")]
    InvertedRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Start date {start} is before current date {now}")]
    StartInPast {
        start: NaiveDateTime,
        now: NaiveDateTime,
    },

    #[error("Start and end date of {0} event are not on the same day")]
    DaySpanMismatch(RecurrenceRule),

    #[error("Start date falls on {0}, which is not in the weekday period")]
    WeekdayMismatch(Weekday),
}
