//! ## Summary
//! Projection of an event's recurrence rules onto concrete occurrence spans.
//!
//! The index answers which events occur on a day; free-time computation needs the
//! actual busy spans. Each recurring rule is expanded with the `rrule` crate from the
//! event's own start, so no occurrence precedes the first real one. Every
//! occurrence keeps the event's duration.

use std::collections::BTreeSet;

use chrono::{NaiveDateTime, TimeDelta};
use rrule::{RRule, RRuleSet, Tz, Unvalidated};

use sked_core::model::{Event, Interval, RecurrenceRule};

use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Builds the RFC 5545 rule texts describing an event's recurrence.
///
/// `ONCE` contributes nothing; all weekday rules are folded into one weekly rule.
#[must_use]
pub fn rrule_texts(event: &Event) -> Vec<String> {
    let mut texts = Vec::new();
    let mut by_day = Vec::new();

    for rule in event.period() {
        match rule {
            RecurrenceRule::Once => {}
            RecurrenceRule::EveryDay => texts.push("FREQ=DAILY".to_owned()),
            RecurrenceRule::EveryMonth => texts.push("FREQ=MONTHLY".to_owned()),
            RecurrenceRule::EveryYear => texts.push("FREQ=YEARLY".to_owned()),
            RecurrenceRule::Monday => by_day.push("MO"),
            RecurrenceRule::Tuesday => by_day.push("TU"),
            RecurrenceRule::Wednesday => by_day.push("WE"),
            RecurrenceRule::Thursday => by_day.push("TH"),
            RecurrenceRule::Friday => by_day.push("FR"),
            RecurrenceRule::Saturday => by_day.push("SA"),
            RecurrenceRule::Sunday => by_day.push("SU"),
        }
    }

    if !by_day.is_empty() {
        texts.push(format!("FREQ=WEEKLY;BYDAY={}", by_day.join(",")));
    }
    texts
}

/// ## Summary
/// Returns the occurrences of `event` whose span touches `window`, in start order.
///
/// A `ONCE` rule contributes the stored span. `daily_horizon_days` limits `EVERY_DAY`
/// recurrence to that many days after the anchor day, matching the index.
///
/// ## Errors
/// Returns [`ServiceError::RecurrenceError`] if a rule cannot be built for the
/// event's start.
pub fn occurrences(
    event: &Event,
    window: Interval,
    daily_horizon_days: Option<u32>,
) -> ServiceResult<Vec<Interval>> {
    let duration = event.duration();
    let mut starts = BTreeSet::new();

    if event.has_rule(RecurrenceRule::Once) {
        starts.insert(event.start());
    }

    for text in rrule_texts(event) {
        let horizon = if text == "FREQ=DAILY" {
            daily_horizon_days
        } else {
            None
        };
        starts.extend(expand(&text, event.start(), duration, window, horizon)?);
    }

    let spans: Vec<Interval> = starts
        .into_iter()
        .map(|start| Interval {
            start,
            end: start + duration,
        })
        .filter(|span| span.start <= window.end && span.end >= window.start)
        .collect();

    tracing::trace!(event_id = %event.id(), count = spans.len(), "Projected occurrences");
    Ok(spans)
}

fn expand(
    text: &str,
    dt_start: NaiveDateTime,
    duration: TimeDelta,
    window: Interval,
    horizon_days: Option<u32>,
) -> ServiceResult<Vec<NaiveDateTime>> {
    let rrule = text
        .parse::<RRule<Unvalidated>>()
        .map_err(|err| ServiceError::RecurrenceError(err.to_string()))?;
    let mut rrule_set: RRuleSet = rrule
        .build(dt_start.and_utc().with_timezone(&Tz::UTC))
        .map_err(|err| ServiceError::RecurrenceError(err.to_string()))?;

    // An occurrence starting up to `duration` before the window still overlaps it.
    let inclusive_start = window.start - duration - TimeDelta::seconds(1);
    let inclusive_end = window.end + TimeDelta::seconds(1);
    rrule_set = rrule_set
        .after(inclusive_start.and_utc().with_timezone(&Tz::UTC))
        .before(inclusive_end.and_utc().with_timezone(&Tz::UTC));

    let last_day = horizon_days.map(|days| dt_start.date() + TimeDelta::days(i64::from(days)));
    Ok(rrule_set
        .all(u16::MAX)
        .dates
        .into_iter()
        .map(|date| date.naive_utc())
        .filter(|start| last_day.is_none_or(|last| start.date() <= last))
        .collect())
}
