//! Exact test of whether a busy span intersects a query period.

use chrono::NaiveDateTime;

use sked_core::error::CoreResult;
use sked_core::model::{Interval, ensure_ordered};

/// ## Summary
/// Returns true if `span` crosses the period `[start, end]`.
///
/// A span crosses when it starts at the period start, ends at the period end,
/// starts or ends strictly inside the period, or strictly contains the period.
/// Spans that only touch the period from outside do not cross.
///
/// ## Errors
/// Returns [`sked_core::error::CoreError::InvertedRange`] if `start > end`.
pub fn crosses(span: Interval, start: NaiveDateTime, end: NaiveDateTime) -> CoreResult<bool> {
    ensure_ordered(start, end)?;
    Ok(span.start == start
        || span.end == end
        || (start < span.start && span.start < end)
        || (start < span.end && span.end < end)
        || (span.start < start && span.end > end))
}
