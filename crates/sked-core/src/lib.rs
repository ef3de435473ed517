//! Domain types, validation and configuration shared by every sked crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod util;
pub mod validation;
