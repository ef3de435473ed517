use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A closed span of time `[start, end]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    /// ## Summary
    /// Creates an interval, rejecting a start that lies after the end.
    ///
    /// ## Errors
    /// Returns [`CoreError::InvertedRange`] if `start > end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> CoreResult<Self> {
        ensure_ordered(start, end)?;
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    #[must_use]
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} .. {}]", self.start, self.end)
    }
}

/// ## Summary
/// Checks the ordering of a `(start, end)` argument pair.
///
/// ## Errors
/// Returns [`CoreError::InvertedRange`] if `start > end`.
pub fn ensure_ordered(start: NaiveDateTime, end: NaiveDateTime) -> CoreResult<()> {
    if start > end {
        return Err(CoreError::InvertedRange { start, end });
    }
    Ok(())
}
