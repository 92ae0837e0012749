//! # Hive resources
//!
//! Minimal models of the Hive `ClusterDeployment` and `SyncSet` resources
//! (`hive.openshift.io/v1`). Unknown fields are ignored on read, so only the
//! fields the operator touches are declared.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A cluster managed by Hive
#[derive(CustomResource, Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    kind = "ClusterDeployment",
    group = "hive.openshift.io",
    version = "v1",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDeploymentSpec {
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default)]
    pub base_domain: String,
    #[serde(default)]
    pub installed: bool,
}

/// Resources Hive applies to the clusters it references
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[kube(kind = "SyncSet", group = "hive.openshift.io", version = "v1", namespaced)]
#[serde(rename_all = "camelCase")]
pub struct SyncSetSpec {
    #[serde(default)]
    pub cluster_deployment_refs: Vec<ClusterDeploymentRef>,
    /// `Upsert` or `Sync`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_apply_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secret_mappings: Vec<SecretMapping>,
}

/// Reference to a ClusterDeployment in the SyncSet's namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ClusterDeploymentRef {
    pub name: String,
}

/// Copies a Secret from the hub onto the managed cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretMapping {
    pub source_ref: SecretReference,
    pub target_ref: SecretReference,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct SecretReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}
