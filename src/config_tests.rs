use crate::config::{CliOverrides, Config, DEFAULT_POSITION_URL};
use crate::domain::position::ValidationPolicy;
use clap::Parser;
use std::env;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::time::Duration;

// Global lock to prevent race conditions when modifying environment variables in tests
static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

const VARS: [&str; 8] = [
    "POSITION_URL",
    "POLL_INTERVAL_MS",
    "METRIC_PREFIX",
    "REQUEST_TIMEOUT_MS",
    "POSITION_VALIDATION",
    "OBSERVABILITY_ENABLED",
    "OBSERVABILITY_PORT",
    "OBSERVABILITY_BIND_ADDRESS",
];

fn clear_env() {
    for key in VARS {
        // SAFETY: callers hold ENV_LOCK, so no other test touches the environment.
        unsafe { env::remove_var(key) };
    }
}

fn set_env(key: &str, value: &str) {
    // SAFETY: callers hold ENV_LOCK.
    unsafe { env::set_var(key, value) };
}

#[test]
fn test_config_defaults() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();

    let config = Config::from_env().unwrap();

    assert_eq!(config.position_url, DEFAULT_POSITION_URL);
    assert_eq!(config.poll_interval(), Duration::from_secs(10));
    assert_eq!(config.metric_prefix, "iss_");
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
    assert_eq!(config.validation, ValidationPolicy::Truthy);
    assert!(config.observability_enabled);
    assert_eq!(config.observability_port, 9090);
}

#[test]
fn test_config_from_env() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();
    set_env("POSITION_URL", "http://localhost:8000/iss");
    set_env("POLL_INTERVAL_MS", "2500");
    set_env("METRIC_PREFIX", "tiangong_");
    set_env("REQUEST_TIMEOUT_MS", "0");
    set_env("POSITION_VALIDATION", "presence");
    set_env("OBSERVABILITY_PORT", "9191");

    let config = Config::from_env().unwrap();

    assert_eq!(config.position_url, "http://localhost:8000/iss");
    assert_eq!(config.poll_interval_ms, 2500);
    assert_eq!(config.metric_prefix, "tiangong_");
    assert_eq!(config.request_timeout(), None);
    assert_eq!(config.validation, ValidationPolicy::PresenceOnly);
    assert_eq!(config.observability_port, 9191);

    clear_env();
}

#[test]
fn test_config_rejects_invalid_values() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();

    set_env("POLL_INTERVAL_MS", "0");
    assert!(Config::from_env().is_err());

    set_env("POLL_INTERVAL_MS", "soon");
    assert!(Config::from_env().is_err());

    set_env("POLL_INTERVAL_MS", "1000");
    set_env("POSITION_URL", "not a url");
    assert!(Config::from_env().is_err());

    set_env("POSITION_URL", "ftp://example.com/iss");
    assert!(Config::from_env().is_err());

    set_env("POSITION_URL", "https://example.com/iss");
    set_env("POSITION_VALIDATION", "lenient");
    assert!(Config::from_env().is_err());

    set_env("POSITION_VALIDATION", "truthy");
    assert!(Config::from_env().is_ok());

    set_env("OBSERVABILITY_PORT", "abc");
    assert!(Config::from_env().is_err());

    set_env("OBSERVABILITY_PORT", "70000");
    assert!(Config::from_env().is_err());

    set_env("OBSERVABILITY_PORT", "9100");
    set_env("OBSERVABILITY_ENABLED", "yes");
    assert!(Config::from_env().is_err());

    set_env("OBSERVABILITY_ENABLED", "false");
    let config = Config::from_env().unwrap();
    assert!(!config.observability_enabled);
    assert_eq!(config.observability_port, 9100);

    clear_env();
}

#[test]
fn test_cli_overrides_environment() {
    let cli = CliOverrides::try_parse_from([
        "orbitwatch",
        "--url",
        "http://127.0.0.1:7000/pos",
        "--interval-ms",
        "500",
        "--prefix",
        "sat_",
        "--port",
        "9999",
    ])
    .unwrap();

    let config = Config::default().with_overrides(cli).unwrap();

    assert_eq!(config.position_url, "http://127.0.0.1:7000/pos");
    assert_eq!(config.poll_interval_ms, 500);
    assert_eq!(config.metric_prefix, "sat_");
    assert_eq!(config.observability_port, 9999);
    assert_eq!(config.request_timeout_ms, 10_000);
}

#[test]
fn test_cli_override_is_validated() {
    let cli = CliOverrides::try_parse_from(["orbitwatch", "--interval-ms", "0"]).unwrap();
    assert!(Config::default().with_overrides(cli).is_err());
}
