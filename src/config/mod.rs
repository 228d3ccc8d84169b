//! Configuration module for orbitwatch.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Poller and Observability. Command-line flags override
//! the environment.

mod cli;
mod observability_config;
mod poller_config;

pub use cli::CliOverrides;
pub use observability_config::ObservabilityEnvConfig;
pub use poller_config::{DEFAULT_METRIC_PREFIX, DEFAULT_POSITION_URL, PollerEnvConfig};

use crate::domain::position::ValidationPolicy;
use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // Poller (from PollerEnvConfig)
    pub position_url: String,
    pub poll_interval_ms: u64,
    pub metric_prefix: String,
    pub request_timeout_ms: u64,
    pub validation: ValidationPolicy,

    // Observability (from ObservabilityEnvConfig)
    pub observability_enabled: bool,
    pub observability_port: u16,
    pub observability_bind_address: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::compose(PollerEnvConfig::default(), ObservabilityEnvConfig::default())
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let poller = PollerEnvConfig::from_env().context("Failed to load poller config")?;
        let observability =
            ObservabilityEnvConfig::from_env().context("Failed to load observability config")?;

        let config = Self::compose(poller, observability);
        config.validate()?;
        Ok(config)
    }

    fn compose(poller: PollerEnvConfig, observability: ObservabilityEnvConfig) -> Self {
        Self {
            position_url: poller.position_url,
            poll_interval_ms: poller.poll_interval_ms,
            metric_prefix: poller.metric_prefix,
            request_timeout_ms: poller.request_timeout_ms,
            validation: poller.validation,

            observability_enabled: observability.enabled,
            observability_port: observability.port,
            observability_bind_address: observability.bind_address,
        }
    }

    /// Apply command-line overrides on top of the environment, then re-validate.
    pub fn with_overrides(mut self, cli: CliOverrides) -> Result<Self> {
        if let Some(url) = cli.url {
            self.position_url = url;
        }
        if let Some(interval_ms) = cli.interval_ms {
            self.poll_interval_ms = interval_ms;
        }
        if let Some(prefix) = cli.prefix {
            self.metric_prefix = prefix;
        }
        if let Some(timeout_ms) = cli.timeout_ms {
            self.request_timeout_ms = timeout_ms;
        }
        if let Some(port) = cli.port {
            self.observability_port = port;
        }
        if let Some(bind_address) = cli.bind_address {
            self.observability_bind_address = bind_address;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.position_url)
            .with_context(|| format!("Invalid POSITION_URL: {}", self.position_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!(
                "Invalid POSITION_URL: {}. Scheme must be http or https",
                self.position_url
            );
        }
        if self.poll_interval_ms == 0 {
            anyhow::bail!("POLL_INTERVAL_MS must be greater than 0");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// `None` when the timeout is disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}
