use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// How an event repeats across future dates.
///
/// An event carries a set of rules; weekday rules may be combined with each other
/// and with the calendar-based rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceRule {
    Once,
    EveryDay,
    EveryMonth,
    EveryYear,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl RecurrenceRule {
    pub const WEEKDAYS: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Once => "ONCE",
            Self::EveryDay => "EVERY_DAY",
            Self::EveryMonth => "EVERY_MONTH",
            Self::EveryYear => "EVERY_YEAR",
            Self::Monday => "MONDAY",
            Self::Tuesday => "TUESDAY",
            Self::Wednesday => "WEDNESDAY",
            Self::Thursday => "THURSDAY",
            Self::Friday => "FRIDAY",
            Self::Saturday => "SATURDAY",
            Self::Sunday => "SUNDAY",
        }
    }

    /// Returns the weekday this rule names, if it is a weekday rule.
    #[must_use]
    pub const fn weekday(self) -> Option<Weekday> {
        match self {
            Self::Monday => Some(Weekday::Mon),
            Self::Tuesday => Some(Weekday::Tue),
            Self::Wednesday => Some(Weekday::Wed),
            Self::Thursday => Some(Weekday::Thu),
            Self::Friday => Some(Weekday::Fri),
            Self::Saturday => Some(Weekday::Sat),
            Self::Sunday => Some(Weekday::Sun),
            Self::Once | Self::EveryDay | Self::EveryMonth | Self::EveryYear => None,
        }
    }

    #[must_use]
    pub const fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }

    #[must_use]
    pub const fn is_weekday(self) -> bool {
        self.weekday().is_some()
    }

    /// Rules whose occurrences must start and end on the same calendar day.
    #[must_use]
    pub const fn requires_single_day(self) -> bool {
        matches!(self, Self::EveryDay) || self.is_weekday()
    }
}

impl std::fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
