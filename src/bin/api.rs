//! Glucolog API Server
//!
//! Run with: cargo run --bin glucolog-api
//!
//! # Configuration
//!
//! Settings come from the first config file found
//! (`~/.config/glucolog/config.toml`, `/etc/glucolog/config.toml`,
//! `./config.toml`), then environment variables:
//! - `GLUCOLOG_DATA_DIR`: Data directory
//! - `GLUCOLOG_API_HOST`: Host to bind to (default: 127.0.0.1)
//! - `GLUCOLOG_API_PORT`: Port to listen on (default: 8090)
//! - `GLUCOLOG_LOG_LEVEL`: Log level (default: info)
//! - `GLUCOLOG_LOG_FORMAT`: `pretty` or `json`
//! - `RUST_LOG`: Full filter directive, takes precedence over the log level

use glucolog::api::{serve, AppState};
use glucolog::config::{Config, LoggingConfig};
use glucolog::storage::RecordStore;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_default();

    init_tracing(&config.logging)?;

    tracing::info!("Starting Glucolog API server v{}", env!("CARGO_PKG_VERSION"));

    let store_config = config.store_config();
    let api_config = config.api_config();

    tracing::info!("Data directory: {:?}", store_config.data_dir);
    tracing::info!("Storage key: {}", store_config.storage_key);

    // Open the record store and make sure the blob is readable before serving
    let store = Arc::new(RecordStore::open(&store_config)?);
    match store.try_get_all().await {
        Ok(records) => tracing::info!("Record store ready ({} records)", records.len()),
        Err(e) => tracing::warn!("Record store is not readable: {} (writes will be refused)", e),
    }

    let recognizer = Arc::new(config.recognizer());
    tracing::info!(
        "Food recognition: mock backend ({} ms latency, {} ms timeout)",
        config.recognition.mock_latency_ms,
        config.recognition.timeout_ms
    );

    let state = AppState::with_recognizer(store, recognizer, api_config.clone());

    tracing::info!("Starting server on {}:{}", api_config.host, api_config.port);
    serve(state, &api_config).await?;

    tracing::info!("Glucolog API server stopped");

    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter_directive().into());

    let writer = match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            Some(Arc::new(file))
        }
        None => None,
    };

    let registry = tracing_subscriber::registry().with(filter);

    match (logging.is_json(), writer) {
        (true, Some(file)) => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(file))
            .init(),
        (true, None) => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        (false, Some(file)) => registry
            .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file))
            .init(),
        (false, None) => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    Ok(())
}
