//! Splunk client errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SplunkError {
    /// No Splunk stack configured
    #[error("missing Splunk instance name")]
    MissingInstance,

    /// No ACS bearer token configured
    #[error("missing Splunk authentication token")]
    MissingAuthToken,

    /// Connection, TLS or timeout failure talking to ACS
    #[error("ACS request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// ACS answered with an error status
    #[error("received error response {code}: {message}")]
    Remote {
        status: u16,
        code: String,
        message: String,
    },

    /// ACS answered with a body that is not the expected JSON
    #[error("failed to decode ACS response (status {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl SplunkError {
    /// Whether the error was reported by ACS with the given HTTP status
    #[must_use]
    pub fn is_status(&self, code: u16) -> bool {
        matches!(self, Self::Remote { status, .. } if *status == code)
    }
}
