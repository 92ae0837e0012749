//! # Controller Configuration
//!
//! Reconcile loop tuning loaded from environment variables.

use super::env_var_or_default;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Deadline for one reconcile pass, store and ACS calls included (`RECONCILE_TIMEOUT_SECS`)
    pub reconcile_timeout: Duration,
    /// Timeout for a single ACS request (`HTTP_REQUEST_TIMEOUT_SECS`)
    pub http_request_timeout: Duration,
    /// Requeue delay after a failed pass (`ERROR_REQUEUE_SECS`)
    pub error_requeue: Duration,
    /// Requeue delay for converged objects (`RESYNC_INTERVAL_SECS`)
    pub resync_interval: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        use crate::constants::*;
        Self {
            reconcile_timeout: Duration::from_secs(DEFAULT_RECONCILE_TIMEOUT_SECS),
            http_request_timeout: Duration::from_secs(DEFAULT_HTTP_REQUEST_TIMEOUT_SECS),
            error_requeue: Duration::from_secs(DEFAULT_ERROR_REQUEUE_SECS),
            resync_interval: Duration::from_secs(DEFAULT_RESYNC_INTERVAL_SECS),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        use crate::constants::*;
        let secs = |key: &str, default: u64| Duration::from_secs(env_var_or_default(key, default));
        Self {
            reconcile_timeout: secs("RECONCILE_TIMEOUT_SECS", DEFAULT_RECONCILE_TIMEOUT_SECS),
            http_request_timeout: secs(
                "HTTP_REQUEST_TIMEOUT_SECS",
                DEFAULT_HTTP_REQUEST_TIMEOUT_SECS,
            ),
            error_requeue: secs("ERROR_REQUEUE_SECS", DEFAULT_ERROR_REQUEUE_SECS),
            resync_interval: secs("RESYNC_INTERVAL_SECS", DEFAULT_RESYNC_INTERVAL_SECS),
        }
    }
}
