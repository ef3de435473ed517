//! Keys of the derived indices.

use chrono::{Datelike, NaiveDate};

use sked_core::model::{Event, Person, RecurrenceRule};

/// Day-and-month signature (`dd-MM`) matching a yearly event against any year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearSignature {
    month: u32,
    day: u32,
}

impl YearSignature {
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

impl std::fmt::Display for YearSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}-{:02}", self.day, self.month)
    }
}

/// One entry an event contributes to a derived index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum IndexKey {
    Title(String),
    Attender(Person),
    ConcreteDay(NaiveDate),
    YearSignature(YearSignature),
    MonthDay(u32),
    Weekday(RecurrenceRule),
    DailyAnchor(NaiveDate),
}

/// ## Summary
/// Lists every derived-index entry an event expands into.
///
/// Insertion and retraction both walk this list, so an event is always removed
/// from exactly the buckets it was added to.
pub(crate) fn index_keys(event: &Event) -> Vec<IndexKey> {
    let mut keys = vec![IndexKey::Title(event.title().to_owned())];
    keys.extend(event.attenders().iter().cloned().map(IndexKey::Attender));

    for rule in event.period() {
        match rule {
            RecurrenceRule::Once => {
                keys.extend(event.spanned_days().map(IndexKey::ConcreteDay));
            }
            RecurrenceRule::EveryYear => keys.extend(
                event
                    .spanned_days()
                    .map(|day| IndexKey::YearSignature(YearSignature::of(day))),
            ),
            RecurrenceRule::EveryMonth => {
                keys.extend(event.spanned_days().map(|day| IndexKey::MonthDay(day.day())));
            }
            RecurrenceRule::EveryDay => keys.push(IndexKey::DailyAnchor(event.start().date())),
            RecurrenceRule::Monday
            | RecurrenceRule::Tuesday
            | RecurrenceRule::Wednesday
            | RecurrenceRule::Thursday
            | RecurrenceRule::Friday
            | RecurrenceRule::Saturday
            | RecurrenceRule::Sunday => keys.push(IndexKey::Weekday(*rule)),
        }
    }

    keys
}
