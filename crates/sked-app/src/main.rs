use sked_app::bootstrap::bootstrap;
use sked_core::config::load_config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting sked scheduling service");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let service = bootstrap(&config)?;

    tracing::info!(
        store = %config.store.path,
        tolerance = %service.engine().tolerance(),
        slot = %service.engine().slot(),
        "Scheduling service ready, press Ctrl-C to stop"
    );

    tokio::signal::ctrl_c().await?;

    tracing::info!(stats = ?service.data().stats(), "Shutting down");

    Ok(())
}
