//! ## Summary
//! Wires the configured event store, the data store and the scheduling service.

use std::sync::Arc;

use sked_core::config::{Settings, StoreConfig, StoreKind};
use sked_db::datastore::DataStore;
use sked_db::store::{EventStore, JsonFileStore, MemoryStore};
use sked_service::clock::SystemClock;
use sked_service::scheduling::CalendarService;

use crate::error::AppResult;

/// ## Summary
/// Opens the durable event store selected by `store.kind`.
///
/// ## Errors
/// Returns an error if the file store directory cannot be created.
pub fn open_store(config: &StoreConfig) -> AppResult<Arc<dyn EventStore>> {
    let store: Arc<dyn EventStore> = match config.kind {
        StoreKind::File => Arc::new(JsonFileStore::open(&config.path)?),
        StoreKind::Memory => {
            tracing::warn!("Using in-memory event store, events will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}

/// ## Summary
/// Builds the scheduling service and rehydrates its index from the event store.
///
/// ## Errors
/// Returns an error if the store cannot be opened or listed, or if the scheduling
/// settings are invalid.
pub fn bootstrap(settings: &Settings) -> AppResult<CalendarService> {
    let store = open_store(&settings.store)?;
    let data = Arc::new(DataStore::with_daily_horizon(
        store,
        settings.scheduling.daily_horizon_days,
    ));

    let count = data.rehydrate()?;
    tracing::info!(count, stats = ?data.stats(), "Events loaded");

    Ok(CalendarService::from_config(
        data,
        &settings.scheduling,
        Arc::new(SystemClock),
    )?)
}
