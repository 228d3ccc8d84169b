//! Metrics endpoint configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Where (and whether) `/metrics` is served
#[derive(Debug, Clone)]
pub struct ObservabilityEnvConfig {
    pub enabled: bool,
    pub port: u16,
    pub bind_address: String,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 9090,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

impl ObservabilityEnvConfig {
    /// Unparseable values are errors, not silent defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            enabled: Self::parse_var("OBSERVABILITY_ENABLED", defaults.enabled)?,
            port: Self::parse_var("OBSERVABILITY_PORT", defaults.port)?,
            bind_address: env::var("OBSERVABILITY_BIND_ADDRESS").unwrap_or(defaults.bind_address),
        })
    }

    fn parse_var<T>(key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match env::var(key) {
            Ok(raw) => raw
                .trim()
                .parse::<T>()
                .with_context(|| format!("Failed to parse {}: {:?}", key, raw)),
            Err(_) => Ok(default),
        }
    }
}
