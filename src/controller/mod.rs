//! # Controllers
//!
//! Two reconcilers share one [`Context`]:
//!
//! - [`splunk_token`]: keeps a remote HEC token and its `outputs.conf` Secret
//!   in step with each SplunkToken, rotating the token once it is too old.
//! - [`cluster_deployment`]: gives every Hive ClusterDeployment a SplunkToken
//!   and a SyncSet delivering the Secret to the managed cluster.

pub mod cluster_deployment;
pub mod context;
pub mod error;
pub mod secret;
pub mod splunk_token;

#[cfg(test)]
pub(crate) mod fixtures;

pub use context::Context;
pub use error::ReconcileError;
