//! # Metrics Module
//!
//! Prometheus metrics for monitoring the operator, organized by responsibility.
//!
//! ## Sub-modules
//!
//! - `registry` - Metrics registry setup and registration
//! - `controller_metrics` - Reconciliation, outcome and requeue metrics
//! - `splunk_metrics` - ACS HEC token API call metrics

pub mod controller_metrics;
pub mod registry;
pub mod splunk_metrics;

pub use controller_metrics::*;
pub use registry::*;
pub use splunk_metrics::*;
