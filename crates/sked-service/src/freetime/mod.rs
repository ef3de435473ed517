//! ## Summary
//! Free-time interval engine.
//!
//! Given a query range and the busy spans inside it, computes the free sub-intervals.
//! Two strategies share one relation classifier ([`Relation`]):
//!
//! - [`FreeTimeEngine::subtract`] removes every busy span from the range, treating
//!   spans within the tolerance of an interval boundary as covering that boundary.
//! - [`FreeTimeEngine::scan_slots`] cuts the range into fixed slots, keeps the slots
//!   no busy span overlaps exactly, and merges adjacent survivors.
//!
//! With a zero tolerance and slot-aligned busy spans both strategies agree.

mod relation;

pub use relation::Relation;

use chrono::TimeDelta;

use sked_core::config::SchedulingConfig;
use sked_core::error::{CoreError, CoreResult};
use sked_core::model::Interval;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeTimeEngine {
    tolerance: TimeDelta,
    slot: TimeDelta,
}

impl Default for FreeTimeEngine {
    fn default() -> Self {
        let defaults = SchedulingConfig::default();
        Self {
            tolerance: TimeDelta::minutes(defaults.tolerance_minutes),
            slot: TimeDelta::minutes(defaults.slot_minutes),
        }
    }
}

impl FreeTimeEngine {
    /// ## Summary
    /// Creates an engine with the given subtraction tolerance and slot length.
    ///
    /// ## Errors
    /// Returns [`CoreError::InvalidArgument`] if the tolerance is negative or the
    /// slot is not positive.
    pub fn new(tolerance: TimeDelta, slot: TimeDelta) -> CoreResult<Self> {
        if tolerance < TimeDelta::zero() {
            return Err(CoreError::InvalidArgument(format!(
                "tolerance must not be negative, got {tolerance}"
            )));
        }
        if slot <= TimeDelta::zero() {
            return Err(CoreError::InvalidArgument(format!(
                "slot must be positive, got {slot}"
            )));
        }
        Ok(Self { tolerance, slot })
    }

    /// ## Summary
    /// Creates an engine from the scheduling configuration.
    ///
    /// ## Errors
    /// Returns [`CoreError::InvalidArgument`] if a configured length is out of range.
    pub fn from_config(config: &SchedulingConfig) -> CoreResult<Self> {
        Self::new(config.tolerance()?, config.slot()?)
    }

    #[must_use]
    pub fn tolerance(&self) -> TimeDelta {
        self.tolerance
    }

    #[must_use]
    pub fn slot(&self) -> TimeDelta {
        self.slot
    }

    /// ## Summary
    /// Subtracts the busy spans from `range`.
    ///
    /// Starts from the single interval `range` and, for each busy span in start
    /// order, classifies it against every current free interval: covered
    /// intervals are dropped, edge overlaps trim the interval, and a span inside an
    /// interval splits it. The tail of a split is inserted right after its head and
    /// is not revisited for the same span.
    ///
    /// The result is ordered and pairwise disjoint. A zero-length range holds no
    /// free time.
    #[must_use]
    pub fn subtract(&self, range: Interval, busy: &[Interval]) -> Vec<Interval> {
        if range.start >= range.end {
            return Vec::new();
        }

        let mut busy = busy.to_vec();
        busy.sort();

        let mut free = vec![range];
        for span in busy {
            let mut i = 0;
            while i < free.len() {
                let current = free[i];
                let relation = Relation::classify(span, current, self.tolerance);
                tracing::trace!(busy = %span, free = %current, ?relation, "Classified busy span");

                let pieces: Vec<Interval> = match relation {
                    Relation::Disjoint => {
                        i += 1;
                        continue;
                    }
                    Relation::Covers => Vec::new(),
                    Relation::LeftEdge => vec![Interval {
                        start: span.end,
                        end: current.end,
                    }],
                    Relation::RightEdge => vec![Interval {
                        start: current.start,
                        end: span.start,
                    }],
                    Relation::Inside => vec![
                        Interval {
                            start: current.start,
                            end: span.start,
                        },
                        Interval {
                            start: span.end,
                            end: current.end,
                        },
                    ],
                };

                let pieces: Vec<Interval> = pieces
                    .into_iter()
                    .filter(|piece| piece.start < piece.end)
                    .collect();
                let kept = pieces.len();
                free.splice(i..=i, pieces);
                i += kept;
            }
        }

        free
    }

    /// ## Summary
    /// Cuts `range` into slots of the engine's slot length and keeps the slots no
    /// busy span overlaps, merged into solid intervals.
    ///
    /// The last slot is clipped to the end of the range, and a zero-length range
    /// yields no slots.
    #[must_use]
    pub fn scan_slots(&self, range: Interval, busy: &[Interval]) -> Vec<Interval> {
        let mut slots = Vec::new();
        let mut start = range.start;
        while start < range.end {
            let end = (start + self.slot).min(range.end);
            let slot = Interval { start, end };
            if !busy
                .iter()
                .any(|span| Relation::classify(*span, slot, TimeDelta::zero()).is_blocking())
            {
                slots.push(slot);
            }
            start = end;
        }

        tracing::trace!(count = slots.len(), "Free slots found");
        merge_solid_intervals(&slots)
    }
}

/// ## Summary
/// Coalesces consecutive intervals where one ends exactly where the next begins.
///
/// Expects its input ordered by start. An empty input yields an empty output, and
/// merging an already merged list returns it unchanged.
#[must_use]
pub fn merge_solid_intervals(intervals: &[Interval]) -> Vec<Interval> {
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if last.end == interval.start => last.end = interval.end,
            _ => merged.push(*interval),
        }
    }
    merged
}

/// Keeps the intervals long enough to hold `duration`, compared in whole minutes.
#[must_use]
pub fn fitting(intervals: Vec<Interval>, duration: TimeDelta) -> Vec<Interval> {
    let needed = duration.num_minutes();
    intervals
        .into_iter()
        .filter(|interval| interval.duration().num_minutes() >= needed)
        .collect()
}
