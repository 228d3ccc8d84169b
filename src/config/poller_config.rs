//! Poller configuration parsing from environment variables.
//!
//! This module handles loading the upstream URL, polling cadence, metric
//! naming and payload validation settings.

use crate::domain::position::ValidationPolicy;
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

pub const DEFAULT_POSITION_URL: &str = "https://api.wheretheiss.at/v1/satellites/25544";
pub const DEFAULT_METRIC_PREFIX: &str = "iss_";

/// Poller environment configuration
#[derive(Debug, Clone)]
pub struct PollerEnvConfig {
    pub position_url: String,
    pub poll_interval_ms: u64,
    pub metric_prefix: String,
    /// `0` disables the per-request timeout
    pub request_timeout_ms: u64,
    pub validation: ValidationPolicy,
}

impl Default for PollerEnvConfig {
    fn default() -> Self {
        Self {
            position_url: DEFAULT_POSITION_URL.to_string(),
            poll_interval_ms: 10_000,
            metric_prefix: DEFAULT_METRIC_PREFIX.to_string(),
            request_timeout_ms: 10_000,
            validation: ValidationPolicy::Truthy,
        }
    }
}

impl PollerEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let validation_str =
            env::var("POSITION_VALIDATION").unwrap_or_else(|_| "truthy".to_string());

        Ok(Self {
            position_url: env::var("POSITION_URL").unwrap_or(defaults.position_url),
            poll_interval_ms: Self::parse_u64("POLL_INTERVAL_MS", defaults.poll_interval_ms)?,
            metric_prefix: env::var("METRIC_PREFIX").unwrap_or(defaults.metric_prefix),
            request_timeout_ms: Self::parse_u64("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms)?,
            validation: ValidationPolicy::from_str(&validation_str)?,
        })
    }

    fn parse_u64(key: &str, default: u64) -> Result<u64> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<u64>()
            .context(format!("Failed to parse {}", key))
    }
}
