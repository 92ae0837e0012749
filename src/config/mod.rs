//! # Operator Configuration
//!
//! Two sources of configuration:
//!
//! - [`OperatorConfig`]: the Splunk stack, token lifetime and per-cluster-type
//!   index tables, loaded from a YAML file mounted from a ConfigMap.
//! - [`ControllerConfig`] and [`ServerConfig`]: runtime tuning loaded from
//!   environment variables, all with defaults.
//!
//! The ACS bearer token is never part of either; it is read from the
//! `SPLUNK_AUTH_TOKEN` environment variable by the binary.

mod controller;
mod duration;
mod operator;
mod server;

pub use controller::ControllerConfig;
pub use duration::parse_kubernetes_duration;
pub use operator::{IndexConfig, OperatorConfig};
pub use server::ServerConfig;

/// Load runtime configuration from environment variables with defaults
#[must_use]
pub fn load_config() -> (ControllerConfig, ServerConfig) {
    (ControllerConfig::from_env(), ServerConfig::from_env())
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
