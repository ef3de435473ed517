#![allow(clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Provides utilities for:
//! - Building a scheduling service over a fresh in-memory or file store
//! - Parsing timestamps in the service's textual layout
//! - Publishing events with the people used across scenarios

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use sked_test::component::clock::FixedClock;
use sked_test::component::db::datastore::DataStore;
use sked_test::component::db::store::{EventStore, MemoryStore};
use sked_test::component::freetime::FreeTimeEngine;
use sked_test::component::model::{Event, Interval, Person, RecurrenceRule};
use sked_test::component::scheduling::{CalendarService, NewEvent};
use sked_test::component::util::date::{parse_date, parse_date_time};

/// Instant the fixed clock reports: every scenario lies after it.
pub const NOW: &str = "2019-06-01 00:00";

pub fn at(text: &str) -> NaiveDateTime {
    parse_date_time(text).expect("valid timestamp")
}

pub fn day(text: &str) -> NaiveDate {
    parse_date(text).expect("valid day")
}

pub fn interval(start: &str, end: &str) -> Interval {
    Interval::new(at(start), at(end)).expect("ordered interval")
}

pub fn alexandr() -> Person {
    Person::new("Alexandr", "Alexandrenko", "alex_alex@ukr.net")
}

pub fn igor() -> Person {
    Person::new("Igor", "Igorov", "igor_igor@ukr.net")
}

pub fn sergey() -> Person {
    Person::new("Sergey", "Sergeev", "sergey_sergey@ukr.net")
}

pub fn service_over(store: Arc<dyn EventStore>, daily_horizon_days: Option<u32>) -> CalendarService {
    let data = Arc::new(DataStore::with_daily_horizon(store, daily_horizon_days));
    CalendarService::new(data, FreeTimeEngine::default(), Arc::new(FixedClock(at(NOW))))
        .with_daily_horizon(daily_horizon_days)
}

pub fn service() -> CalendarService {
    service_over(Arc::new(MemoryStore::new()), None)
}

pub fn draft(title: &str, start: &str, end: &str) -> NewEvent {
    NewEvent {
        title: title.to_owned(),
        description: format!("{title}!"),
        start: start.to_owned(),
        end: end.to_owned(),
    }
}

pub fn publish(
    service: &CalendarService,
    title: &str,
    start: &str,
    end: &str,
    attenders: impl IntoIterator<Item = Person>,
    period: impl IntoIterator<Item = RecurrenceRule>,
) -> Event {
    service
        .create_event(draft(title, start, end), attenders, period)
        .expect("event published")
}

/// Publishes the two parties of the September scenario, attended by everyone.
pub fn september_parties(service: &CalendarService) -> (Event, Event) {
    let everyone = [alexandr(), igor(), sergey()];
    let first = publish(
        service,
        "Mega Party",
        "2020-09-07 15:00",
        "2020-09-07 19:00",
        everyone.clone(),
        [RecurrenceRule::Once],
    );
    let second = publish(
        service,
        "Mega Party 2",
        "2020-09-09 13:00",
        "2020-09-09 18:00",
        everyone,
        [RecurrenceRule::Once],
    );
    (first, second)
}
