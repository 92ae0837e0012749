//! Reconciliation errors

use crate::splunk::SplunkError;
use crate::store::StoreError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The ClusterDeployment lacks a label the operator needs
    #[error("label {0} not found on ClusterDeployment")]
    LabelMissing(&'static str),

    #[error(transparent)]
    Splunk(#[from] SplunkError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The pass did not finish within the reconcile deadline
    #[error("reconciliation did not complete within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("{kind} is missing metadata.{field}")]
    MissingMetadata {
        kind: &'static str,
        field: &'static str,
    },
}

impl ReconcileError {
    /// Short label used for metrics and requeue reasons
    #[must_use]
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::LabelMissing(_) => "label_missing",
            Self::Splunk(SplunkError::MissingInstance | SplunkError::MissingAuthToken) => {
                "splunk_config"
            }
            Self::Splunk(SplunkError::Transport(_)) => "splunk_transport",
            Self::Splunk(SplunkError::Remote { .. }) => "splunk_remote",
            Self::Splunk(SplunkError::Decode { .. }) => "splunk_decode",
            Self::Store(StoreError::Conflict { .. }) => "store_conflict",
            Self::Store(_) => "store",
            Self::Timeout(_) => "timeout",
            Self::MissingMetadata { .. } => "missing_metadata",
        }
    }
}
