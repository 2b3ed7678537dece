//! ducktor: service liveness monitor.
//!
//! # Architecture Overview
//!
//! ```text
//!   config.toml ──▶ config::load_config ──▶ health::Monitor::from_config
//!                                                   │
//!                         ┌─────────────────────────┼─────────────────────────┐
//!                         ▼                         ▼                         ▼
//!                  ┌─────────────┐           ┌─────────────┐           ┌─────────────┐
//!                  │ poll loop A │           │ poll loop B │    ...    │ poll loop N │
//!                  │ probe→state │           │ probe→state │           │ probe→state │
//!                  └──────┬──────┘           └──────┬──────┘           └──────┬──────┘
//!                         └──────────────┬──────────┴──────────────────────────┘
//!                                        ▼
//!                            Arc<RwLock<Vec<ServiceState>>>
//!                                 │                  │
//!                                 ▼                  ▼
//!                        StatusView::snapshot   HealthRecorder
//!                         (/health, /info)     (Prometheus :2112)
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use clap::Parser;
use tokio::net::TcpListener;

use ducktor::config::load_config;
use ducktor::health::Monitor;
use ducktor::http::StatusServer;
use ducktor::lifecycle::{wait_for_signal, Shutdown};
use ducktor::observability::logging::init_logging;
use ducktor::observability::metrics::{init_metrics, PrometheusRecorder};

#[derive(Parser)]
#[command(name = "ducktor")]
#[command(about = "Periodically probes services and reports their health", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = load_config(&cli.config);
    let level = loaded
        .as_ref()
        .map(|c| c.observability.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(&level);

    tracing::info!("ducktor v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = %cli.config.display(), error = %e, "Error loading configuration");
            return Err(e.into());
        }
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        services = config.services.len(),
        default_interval_ms = config.defaults.interval_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        init_metrics(addr)?;
    }

    let monitor = Monitor::from_config(&config, Arc::new(PrometheusRecorder))?;

    let shutdown = Shutdown::new();
    let handle = monitor.start(&shutdown);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = StatusServer::new(handle.status(), &config.listener);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    wait_for_signal().await;
    shutdown.trigger();

    match server_task.await {
        Ok(Err(e)) => tracing::error!(error = %e, "Status server failed"),
        Err(e) => tracing::error!(error = %e, "Status server task panicked"),
        Ok(Ok(())) => {}
    }
    handle.join().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
