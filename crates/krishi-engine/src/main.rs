//! Game server binary for the Krishi farm simulation.
//!
//! Wires the game session to file storage, tokio timers, and the command
//! API, then serves until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `krishi-config.yaml` (or `KRISHI_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Restore the saved game, or start a new farm
//! 4. Start the growth, autosave, and tip timers
//! 5. Serve the API until shutdown
//! 6. Stop the timers and write a final save

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use krishi_api::AppState;
use krishi_core::{FileStorage, GameConfig, GameSession, SystemClock, TokioScheduler};
use krishi_core::config::LoggingConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default location of the configuration file.
const DEFAULT_CONFIG_PATH: &str = "krishi-config.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let config = load_config().context("loading configuration")?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!(
        plots = config.game.plot_count,
        tick_interval_ms = config.game.tick_interval_ms,
        weather_mode = ?config.weather.mode,
        storage_dir = %config.storage.dir.display(),
        "krishi-engine starting"
    );

    // 3. Restore the game.
    let host = config.server.host.clone();
    let port = config.server.port;
    let storage = Arc::new(FileStorage::new(config.storage.dir.clone()));
    let session = Arc::new(GameSession::open(
        config,
        Arc::new(SystemClock),
        Arc::new(TokioScheduler::new()),
        storage,
    ));

    // 4. Start timers.
    session.start();

    // 5. Serve until Ctrl-C.
    let state = Arc::new(AppState::new(Arc::clone(&session)));
    let served = krishi_api::start_server(&host, port, state, shutdown_signal())
        .await
        .map_err(EngineError::from);

    // 6. Final save, even when the server failed.
    session.stop();
    served.context("running API server")?;

    info!("krishi-engine shutdown complete");
    Ok(())
}

/// Load `KRISHI_CONFIG` or `krishi-config.yaml`, falling back to defaults
/// when the file does not exist.
fn load_config() -> Result<GameConfig, EngineError> {
    let path = std::env::var("KRISHI_CONFIG").map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        Ok(GameConfig::from_file(&path)?)
    } else {
        let mut config = GameConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C; shutting down");
    }
    info!("shutdown signal received");
}
