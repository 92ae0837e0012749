//! # Observability
//!
//! Prometheus metrics, exposed by the HTTP server in [`crate::runtime::server`].

pub mod metrics;
