//! Trigger Engine Binary
//!
//! Starts the conditional order trigger engine with the in-process reference
//! adapters.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin trigger-engine
//! ```
//!
//! # Environment Variables
//!
//! - `TRIGGER_ENGINE_CONFIG`: Config file path (default: config.yaml; defaults
//!   are used when the file does not exist)
//! - `RUST_LOG`: Log filter (overrides `observability.logging.level`)
//! - `OTEL_ENABLED`: Set to `true` to export spans over OTLP

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use trigger_engine::config::{Config, ConfigError, DEFAULT_CONFIG_PATH, load_config};
use trigger_engine::observability::{MetricsConfig, init_metrics};
use trigger_engine::telemetry::init_telemetry;
use trigger_engine::{
    InMemoryOrderStore, LoggingExecutionSink, OrderExecutionEngine, StandardOrderConverter,
    StaticQuoteSource,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config_path =
        std::env::var("TRIGGER_ENGINE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let (config, config_found) = read_config(&config_path)?;

    let _telemetry = init_telemetry(&config.observability.logging);

    tracing::info!(
        config_path = %config_path,
        config_found,
        poll_interval_ms = config.engine.poll_interval_ms,
        worker_pool_size = config.engine.worker_pool_size,
        side_policy = ?config.engine.side_policy,
        "Starting trigger engine"
    );

    if config.observability.metrics.enabled {
        let addr: SocketAddr = config
            .observability
            .metrics
            .listen_address
            .parse()
            .context("invalid metrics listen address")?;
        init_metrics(&MetricsConfig::with_addr(addr))?;
    }

    let engine_config = config.engine.to_engine_config();
    let engine = Arc::new(OrderExecutionEngine::with_config(
        engine_config,
        Arc::new(StaticQuoteSource::new()),
        Arc::new(StandardOrderConverter::new(engine_config.side_policy)),
        Arc::new(InMemoryOrderStore::new()),
        Arc::new(LoggingExecutionSink::new()),
    ));

    engine
        .start()
        .await
        .context("failed to start trigger engine")?;

    shutdown_signal().await;

    engine.stop().await;

    let status = engine.get_status();
    tracing::info!(
        orders_processed = status.orders_processed,
        orders_triggered = status.orders_triggered,
        "Trigger engine stopped"
    );

    Ok(())
}

/// Load the config file, falling back to defaults when it does not exist.
fn read_config(path: &str) -> anyhow::Result<(Config, bool)> {
    match load_config(Some(path)) {
        Ok(config) => Ok((config, true)),
        Err(ConfigError::ReadError { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            Ok((Config::default(), false))
        }
        Err(e) => Err(e).with_context(|| format!("failed to load config from {path}")),
    }
}

/// Load `.env` from the working directory or the nearest ancestor.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
