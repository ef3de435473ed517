//! Scheduling service: free-time computation and attendee availability on top of the event index.

pub mod clock;
pub mod crossing;
pub mod error;
pub mod freetime;
pub mod recurrence;
pub mod scheduling;
