//! Immutable value types of the calendar domain.

mod event;
mod interval;
mod person;
mod recurrence;

pub use event::{Event, EventBuilder, EventId};
pub use interval::{Interval, ensure_ordered};
pub use person::Person;
pub use recurrence::RecurrenceRule;
