//! orbitwatch - position exporter
//!
//! Polls an HTTP API for the current position of an orbiting object and
//! publishes latitude, longitude and altitude as Prometheus gauges on
//! `GET /metrics`.
//!
//! # Usage
//! ```sh
//! POSITION_URL=https://api.wheretheiss.at/v1/satellites/25544 cargo run -- --interval-ms 5000
//! ```
//!
//! # Environment Variables
//! - `POSITION_URL` - Upstream JSON endpoint
//! - `POLL_INTERVAL_MS` - Milliseconds between polls (default: 10000)
//! - `METRIC_PREFIX` - Gauge name prefix (default: `iss_`)
//! - `REQUEST_TIMEOUT_MS` - Per-request timeout, 0 disables (default: 10000)
//! - `POSITION_VALIDATION` - `truthy` or `presence` (default: truthy)
//! - `OBSERVABILITY_ENABLED` - Serve `/metrics` (default: true)
//! - `OBSERVABILITY_PORT` - Metrics port (default: 9090)

use anyhow::Result;
use clap::Parser;
use orbitwatch::application::{PositionPoller, Scheduler};
use orbitwatch::config::{CliOverrides, Config};
use orbitwatch::infrastructure::observability::{Metrics, MetricsServer};
use orbitwatch::infrastructure::{HttpClientFactory, HttpPositionSource};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("orbitwatch {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?.with_overrides(CliOverrides::parse())?;
    info!(
        "Configuration loaded: url={}, interval={:?}, prefix={}, timeout={:?}, validation={:?}",
        config.position_url,
        config.poll_interval(),
        config.metric_prefix,
        config.request_timeout(),
        config.validation
    );

    let metrics = Metrics::new(&config.metric_prefix)?;
    let shutdown = CancellationToken::new();

    let server_handle = if config.observability_enabled {
        let server = MetricsServer::bind(
            &config.observability_bind_address,
            config.observability_port,
            metrics.clone(),
        )
        .await?;
        let token = shutdown.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = server.run(token).await {
                error!("Metrics server stopped: {:#}", e);
            }
        }))
    } else {
        info!("Metrics endpoint disabled.");
        None
    };

    let client = HttpClientFactory::create_client(config.request_timeout())?;
    let source = Arc::new(HttpPositionSource::new(client, config.position_url.clone()));
    let poller = Arc::new(PositionPoller::new(source, metrics, config.validation));

    let schedule = Scheduler::schedule(poller, config.poll_interval(), |e| {
        error!("Position poll failed: {:#}", e);
    });

    info!("Running. Press Ctrl+C to shutdown.");
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting...");

    schedule.stop();
    schedule.join().await?;
    shutdown.cancel();
    if let Some(handle) = server_handle {
        handle.await?;
    }

    Ok(())
}
