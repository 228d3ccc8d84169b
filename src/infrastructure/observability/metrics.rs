//! Prometheus metrics definitions for orbitwatch
//!
//! Gauge names are composed from a configurable prefix, e.g. with the
//! prefix `iss_`: `iss_position_latitude`, `iss_position_longitude`,
//! `iss_altitude`.

use crate::domain::position::PositionReading;
use prometheus::{
    CounterVec, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;
use tracing::warn;

/// Prometheus metrics for the position exporter
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Latitude of the last successful reading, in degrees
    pub latitude: GenericGauge<AtomicF64>,
    /// Longitude of the last successful reading, in degrees
    pub longitude: GenericGauge<AtomicF64>,
    /// Altitude of the last successful reading, in kilometres
    pub altitude: GenericGauge<AtomicF64>,
    /// Polls by outcome (success, transport, parse, status, validation)
    pub polls_total: CounterVec,
    /// Poll duration in seconds
    pub poll_duration_seconds: Histogram,
    /// Unix time of the last successful poll
    pub last_success_timestamp_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance on a fresh registry
    pub fn new(prefix: &str) -> anyhow::Result<Self> {
        Self::with_registry(Registry::new(), prefix)
    }

    /// Register all gauges and counters on `registry`
    pub fn with_registry(registry: Registry, prefix: &str) -> anyhow::Result<Self> {
        let latitude = Gauge::with_opts(Opts::new(
            format!("{}position_latitude", prefix),
            "Current latitude of the tracked object in degrees",
        ))?;
        registry.register(Box::new(latitude.clone()))?;

        let longitude = Gauge::with_opts(Opts::new(
            format!("{}position_longitude", prefix),
            "Current longitude of the tracked object in degrees",
        ))?;
        registry.register(Box::new(longitude.clone()))?;

        let altitude = Gauge::with_opts(Opts::new(
            format!("{}altitude", prefix),
            "Current altitude of the tracked object in kilometres",
        ))?;
        registry.register(Box::new(altitude.clone()))?;

        let polls_total = CounterVec::new(
            Opts::new(
                format!("{}polls_total", prefix),
                "Total position polls by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(polls_total.clone()))?;

        let poll_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                format!("{}poll_duration_seconds", prefix),
                "Position poll duration in seconds",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        )?;
        registry.register(Box::new(poll_duration_seconds.clone()))?;

        let last_success_timestamp_seconds = Gauge::with_opts(Opts::new(
            format!("{}last_success_timestamp_seconds", prefix),
            "Unix timestamp of the last successful position poll",
        ))?;
        registry.register(Box::new(last_success_timestamp_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            latitude,
            longitude,
            altitude,
            polls_total,
            poll_duration_seconds,
            last_success_timestamp_seconds,
        })
    }

    /// Publish a validated reading. All three gauges are written together.
    pub fn set_position(&self, reading: &PositionReading) {
        self.latitude.set(reading.latitude);
        self.longitude.set(reading.longitude);
        self.altitude.set(reading.altitude);
        self.last_success_timestamp_seconds
            .set(chrono::Utc::now().timestamp() as f64);
    }

    /// Increment the poll counter for `outcome`
    pub fn inc_polls(&self, outcome: &str) {
        self.polls_total.with_label_values(&[outcome]).inc();
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        match encoder.encode_to_string(&metric_families) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to encode metrics, serving empty body: {}", e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge_names_use_prefix() {
        let metrics = Metrics::new("iss_").expect("Failed to create metrics");
        metrics.set_position(&PositionReading {
            latitude: 51.5,
            longitude: -0.1,
            altitude: 408.2,
        });
        let output = metrics.render();
        assert!(output.contains("iss_position_latitude 51.5"));
        assert!(output.contains("iss_position_longitude -0.1"));
        assert!(output.contains("iss_altitude 408.2"));
    }

    #[test]
    fn test_poll_counter_by_outcome() {
        let metrics = Metrics::new("test_").expect("Failed to create metrics");
        metrics.inc_polls("success");
        metrics.inc_polls("status");
        metrics.inc_polls("status");
        assert_eq!(metrics.polls_total.with_label_values(&["status"]).get(), 2.0);
        assert!(metrics.render().contains("test_polls_total"));
    }

    #[test]
    fn test_render_after_repeated_updates() {
        let metrics = Metrics::new("render_").expect("Failed to create metrics");
        for i in 0..3 {
            metrics.set_position(&PositionReading {
                latitude: i as f64,
                longitude: 1.5,
                altitude: 400.0,
            });
        }
        let output = metrics.render();
        assert!(!output.is_empty());
        assert!(output.contains("render_position_latitude 2"));
        assert!(output.contains("# TYPE render_altitude gauge"));
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        assert!(Metrics::new("bad prefix ").is_err());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let registry = Registry::new();
        let first = Metrics::with_registry(registry.clone(), "dup_");
        assert!(first.is_ok());
        assert!(Metrics::with_registry(registry, "dup_").is_err());
    }
}
