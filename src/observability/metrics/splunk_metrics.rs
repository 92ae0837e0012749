//! # Splunk Metrics
//!
//! Metrics for calls to the ACS HEC token API.

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::{HistogramVec, IntCounterVec};
use std::sync::LazyLock;

static HEC_OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "splunk_token_operator_hec_operations_total",
            "Total number of ACS HEC token operations by operation and result",
        ),
        &["operation", "result"],
    )
    .expect("Failed to create HEC_OPERATIONS_TOTAL metric - this should never happen")
});

static HEC_OPERATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "splunk_token_operator_hec_operation_duration_seconds",
            "Duration of ACS HEC token operations in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"],
    )
    .expect("Failed to create HEC_OPERATION_DURATION metric - this should never happen")
});

pub(crate) fn register_splunk_metrics() -> Result<()> {
    REGISTRY.register(Box::new(HEC_OPERATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(HEC_OPERATION_DURATION.clone()))?;
    Ok(())
}

/// Record one ACS call
pub fn record_hec_operation(operation: &str, success: bool, duration: f64) {
    let result = if success { "success" } else { "error" };
    HEC_OPERATIONS_TOTAL
        .with_label_values(&[operation, result])
        .inc();
    HEC_OPERATION_DURATION
        .with_label_values(&[operation])
        .observe(duration);
}
