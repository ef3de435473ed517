//! Process bootstrap for the scheduling service.

pub mod bootstrap;
pub mod error;
