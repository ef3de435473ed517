use chrono::TimeDelta;

use sked_core::model::Interval;

/// How a busy span relates to one free interval `[s, e]` under a tolerance `B`.
///
/// The relations are mutually exclusive and evaluated once per interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Starts before `s + B` and ends after `e - B`: the whole interval is busy.
    Covers,
    /// Starts before `s + B` and ends inside `(s, e - B]`: the interval starts later.
    LeftEdge,
    /// Starts inside `[s + B, e)` and ends after `e - B`: the interval ends earlier.
    RightEdge,
    /// Lies within `[s + B, e - B]`: the interval splits in two.
    Inside,
    /// No overlap.
    Disjoint,
}

impl Relation {
    #[must_use]
    pub fn classify(busy: Interval, free: Interval, tolerance: TimeDelta) -> Self {
        let starts_early = busy.start < free.start + tolerance;
        let ends_late = busy.end > free.end - tolerance;
        let intersects = busy.start < free.end && busy.end > free.start;

        if starts_early && ends_late && intersects {
            Self::Covers
        } else if starts_early && busy.end > free.start && !ends_late {
            Self::LeftEdge
        } else if !starts_early && busy.start < free.end && ends_late {
            Self::RightEdge
        } else if !starts_early && !ends_late {
            Self::Inside
        } else {
            Self::Disjoint
        }
    }

    #[must_use]
    pub fn is_blocking(self) -> bool {
        self != Self::Disjoint
    }
}
