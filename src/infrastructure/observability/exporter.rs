//! Pull-based metrics endpoint
//!
//! Serves the registry in Prometheus text format on `GET /metrics` and a
//! liveness probe on `GET /health`. Read-only: no route mutates state.

use crate::infrastructure::observability::metrics::Metrics;
use anyhow::{Context, Result};
use axum::Router;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

const TEXT_FORMAT: &str = "text/plain; version=0.0.4; charset=utf-8";

pub fn build_router(metrics: Metrics) -> Router {
    Router::new()
        .route("/metrics", get(render_metrics))
        .route("/health", get(health))
        .with_state(metrics)
}

async fn render_metrics(State(metrics): State<Metrics>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, TEXT_FORMAT)], metrics.render())
}

async fn health() -> &'static str {
    "ok"
}

/// HTTP server exposing the metrics registry
pub struct MetricsServer {
    listener: TcpListener,
    metrics: Metrics,
}

impl MetricsServer {
    /// Bind the listener. Port `0` picks a free port.
    pub async fn bind(bind_address: &str, port: u16, metrics: Metrics) -> Result<Self> {
        let addr = format!("{}:{}", bind_address, port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind metrics server on {}", addr))?;
        Ok(Self { listener, metrics })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("Failed to read metrics server address")
    }

    /// Serve until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        info!(
            "MetricsServer: listening on http://{}/metrics",
            self.local_addr()?
        );
        axum::serve(self.listener, build_router(self.metrics))
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .context("Metrics server failed")
    }
}
