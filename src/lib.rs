//! # Splunk Token Operator
//!
//! A Kubernetes operator that manages Splunk HTTP Event Collector (HEC)
//! tokens for Hive-managed OpenShift clusters.
//!
//! ## Overview
//!
//! 1. **ClusterDeployment controller** - gives every Hive ClusterDeployment a
//!    `SplunkToken` named `cluster`, configured with the indexes for the
//!    cluster's type, and a `SyncSet` that copies the token Secret onto the
//!    managed cluster.
//! 2. **SplunkToken controller** - creates the HEC token through the Splunk
//!    Admin Config Service (ACS), stores it as an immutable `outputs.conf`
//!    Secret, rotates it once it is older than `tokenMaxAge`, and revokes it
//!    remotely before the `SplunkToken` is allowed to go away.
//!
//! ## Features
//!
//! - **Rotation by recreation**: an expired token is deleted; the owning
//!   ClusterDeployment recreates it, which yields a new remote token
//! - **Finalizer-guarded revocation**: remote tokens never outlive their object
//! - **Prometheus metrics** and **health probes** on one HTTP port

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod observability;
pub mod runtime;
pub mod splunk;
pub mod store;
