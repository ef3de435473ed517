/// Tolerance buffer applied by the interval-subtraction strategy, in minutes.
pub const DEFAULT_TOLERANCE_MINUTES: i64 = 15;

/// Slot length of the discretized free-time scan, in minutes.
pub const DEFAULT_SLOT_MINUTES: i64 = 15;

/// Textual timestamp layout accepted at the service boundary (`2020-10-15 15:00`).
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Textual calendar-day layout (`2020-10-15`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time of day appended to a bare day when building all-day events.
pub const START_OF_DAY: &str = "00:00";

/// File extension of documents written by the file event store.
pub const EVENT_FILE_EXTENSION: &str = "json";
pub const EVENT_FILE_SUFFIX: &str = const_str::concat!(".", EVENT_FILE_EXTENSION);

/// Default directory of the file event store.
pub const DEFAULT_STORE_PATH: &str = "events";

/// Prefix of environment variables read into the settings (`SKED_STORE__PATH`).
pub const ENV_PREFIX: &str = "SKED";
