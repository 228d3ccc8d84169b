//! Command-line overrides for the environment configuration.

use clap::Parser;

#[derive(Parser, Debug, Default, Clone)]
#[command(
    author,
    version,
    about = "Publishes the position of an orbiting object as Prometheus gauges",
    long_about = None
)]
pub struct CliOverrides {
    /// Upstream position URL
    #[arg(long)]
    pub url: Option<String>,

    /// Milliseconds between polls
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Metric name prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Per-request timeout in milliseconds (0 disables)
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Metrics endpoint port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Metrics endpoint bind address
    #[arg(long)]
    pub bind_address: Option<String>,
}
