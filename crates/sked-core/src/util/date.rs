//! Text <-> timestamp conversion for the service boundary.
//!
//! ## Summary
//! Timestamps are written as `yyyy-MM-dd HH:mm` and days as `yyyy-MM-dd`.
//! Values are local wall-clock times without a zone.

use chrono::{NaiveDate, NaiveDateTime};

use crate::constants::{DATE_FORMAT, DATE_TIME_FORMAT, START_OF_DAY};
use crate::error::{CoreError, CoreResult};

/// ## Summary
/// Parses a `yyyy-MM-dd HH:mm` timestamp.
///
/// ## Errors
/// Returns [`CoreError::ParseError`] if the text does not match the layout exactly.
pub fn parse_date_time(text: &str) -> CoreResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
        .map_err(|err| CoreError::ParseError(format!("wrong format of date/time '{text}': {err}")))
}

/// ## Summary
/// Parses a `yyyy-MM-dd` day.
///
/// ## Errors
/// Returns [`CoreError::ParseError`] if the text does not match the layout exactly.
pub fn parse_date(text: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|err| CoreError::ParseError(format!("wrong format of date '{text}': {err}")))
}

/// ## Summary
/// Parses a `yyyy-MM-dd` day as the timestamp of its first minute.
///
/// ## Errors
/// Returns [`CoreError::ParseError`] if the text does not match the layout exactly.
pub fn parse_start_of_day(text: &str) -> CoreResult<NaiveDateTime> {
    parse_date_time(&format!("{text} {START_OF_DAY}"))
}

#[must_use]
pub fn format_date_time(value: NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}
