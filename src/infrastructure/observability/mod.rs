//! Observability for orbitwatch
//!
//! The position gauges and poll bookkeeping live in a Prometheus registry
//! ([`Metrics`]) which is exposed to scrapers by [`MetricsServer`] on
//! `GET /metrics`.

pub mod exporter;
pub mod metrics;

pub use exporter::MetricsServer;
pub use metrics::Metrics;
