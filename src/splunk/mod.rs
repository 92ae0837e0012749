//! # Splunk ACS
//!
//! Client for the Splunk Admin Config Service HTTP Event Collector API.
//!
//! The reconcilers only see the [`TokenManager`] trait. [`SplunkClient`] is
//! the production implementation; tests substitute a mock.

mod client;
mod error;

pub use client::SplunkClient;
pub use error::SplunkError;

use crate::crd::SplunkTokenSpec;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A HEC token as returned by ACS
///
/// `value` is the credential itself and is wiped from memory on drop.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct HecToken {
    #[serde(default, alias = "Spec")]
    #[zeroize(skip)]
    pub spec: SplunkTokenSpec,
    #[serde(default, rename = "token", skip_serializing_if = "String::is_empty")]
    pub value: String,
}

impl std::fmt::Debug for HecToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HecToken")
            .field("spec", &self.spec)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// Management of HEC tokens on a single Splunk stack
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TokenManager: Send + Sync {
    /// Create a token and return it, value included
    ///
    /// A token that already exists under the same name is returned as is.
    async fn create_token(&self, spec: &SplunkTokenSpec) -> Result<HecToken, SplunkError>;

    /// Read a token by name
    async fn read_token(&self, name: &str) -> Result<HecToken, SplunkError>;

    /// Delete a token by name. Deleting a missing token succeeds.
    async fn delete_token(&self, name: &str) -> Result<(), SplunkError>;
}
