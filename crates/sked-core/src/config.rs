use anyhow::Result;
use chrono::TimeDelta;
use config::{Config, Environment};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_SLOT_MINUTES, DEFAULT_STORE_PATH, DEFAULT_TOLERANCE_MINUTES, ENV_PREFIX,
};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub store: StoreConfig,
    pub scheduling: SchedulingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    File,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub kind: StoreKind,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulingConfig {
    pub tolerance_minutes: i64,
    pub slot_minutes: i64,
    /// Days after the anchor day during which an `EVERY_DAY` event keeps recurring.
    /// Unset means it recurs indefinitely.
    pub daily_horizon_days: Option<u32>,
}

impl SchedulingConfig {
    /// ## Summary
    /// Returns the tolerance buffer of the subtraction strategy.
    ///
    /// ## Errors
    /// Returns [`CoreError::InvalidArgument`] if the configured value is negative.
    pub fn tolerance(&self) -> CoreResult<TimeDelta> {
        if self.tolerance_minutes < 0 {
            return Err(CoreError::InvalidArgument(format!(
                "scheduling.tolerance_minutes must not be negative, got {}",
                self.tolerance_minutes
            )));
        }
        Ok(TimeDelta::minutes(self.tolerance_minutes))
    }

    /// ## Summary
    /// Returns the slot length of the discretized strategy.
    ///
    /// ## Errors
    /// Returns [`CoreError::InvalidArgument`] if the configured value is not positive.
    pub fn slot(&self) -> CoreResult<TimeDelta> {
        if self.slot_minutes <= 0 {
            return Err(CoreError::InvalidArgument(format!(
                "scheduling.slot_minutes must be positive, got {}",
                self.slot_minutes
            )));
        }
        Ok(TimeDelta::minutes(self.slot_minutes))
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            tolerance_minutes: DEFAULT_TOLERANCE_MINUTES,
            slot_minutes: DEFAULT_SLOT_MINUTES,
            daily_horizon_days: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `SKED_`-prefixed environment variables and an optional
    /// `config.toml` into a `Settings`.
    ///
    /// Nested keys use `__` between levels, e.g. `SKED_SCHEDULING__TOLERANCE_MINUTES`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Self::load_from(environment())
    }

    fn load_from(environment: Environment) -> Result<Self> {
        Ok(Config::builder()
            .set_default("store.kind", "file")?
            .set_default("store.path", DEFAULT_STORE_PATH)?
            .set_default("scheduling.tolerance_minutes", DEFAULT_TOLERANCE_MINUTES)?
            .set_default("scheduling.slot_minutes", DEFAULT_SLOT_MINUTES)?
            .set_default("logging.level", "info")?
            // Env file
            .add_source(environment)
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// Single `_` stays inside key names; `__` separates levels.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .convert_case(config::Case::Snake)
        .ignore_empty(true)
        .try_parsing(true)
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(err) => tracing::debug!(error = %err, "No .env file loaded"),
    }

    Settings::load()
}
