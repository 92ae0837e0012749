//! # Custom Resource Definitions
//!
//! CRD types for the Splunk token operator.
//!
//! [`SplunkToken`] is owned by this operator. The Hive types in [`hive`] are
//! external and only modelled as far as the operator reads or writes them.

pub mod hive;
pub mod time;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// SplunkToken Custom Resource Definition
///
/// Declares a Splunk HTTP Event Collector token. The operator creates the
/// token through ACS and stores it, rendered as a forwarder `outputs.conf`,
/// in the `splunk-hec-token` Secret next to this object.
///
/// # Example
///
/// ```yaml
/// apiVersion: splunktoken.managed.openshift.io/v1alpha1
/// kind: SplunkToken
/// metadata:
///   name: cluster
///   namespace: uhc-production-1234
/// spec:
///   name: 2b2b9f9a-0c7d-4c1d-9d0e-6b7c1a3e8f11
///   defaultIndex: classic_index
///   allowedIndexes:
///     - another_classic_index
/// ```
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[kube(
    kind = "SplunkToken",
    group = "splunktoken.managed.openshift.io",
    version = "v1alpha1",
    namespaced,
    shortname = "st",
    printcolumn = r#"{"name":"Token", "type":"string", "jsonPath":".spec.name"}, {"name":"Default Index", "type":"string", "jsonPath":".spec.defaultIndex"}, {"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct SplunkTokenSpec {
    /// Name of the HEC token in Splunk. Unique per Splunk stack.
    pub name: String,
    /// Index events are written to when the sender does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_index: Option<String>,
    /// Indexes the token may write to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_indexes: Vec<String>,
}

impl SplunkTokenSpec {
    /// Returns the spec with a non-empty default index appended to the
    /// allowed indexes if it is not already listed.
    ///
    /// Order is preserved and the default index is never duplicated.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut spec = self.clone();
        if let Some(default_index) = spec.default_index.as_deref().filter(|i| !i.is_empty()) {
            if !spec.allowed_indexes.iter().any(|i| i == default_index) {
                spec.allowed_indexes.push(default_index.to_owned());
            }
        }
        spec
    }

    /// Whether the index configuration of two specs match
    ///
    /// The token name is not compared. Allowed index order is significant.
    #[must_use]
    pub fn same_indexes(&self, other: &Self) -> bool {
        self.default_index == other.default_index && self.allowed_indexes == other.allowed_indexes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::CustomResourceExt;

    fn spec(default_index: Option<&str>, allowed: &[&str]) -> SplunkTokenSpec {
        SplunkTokenSpec {
            name: "bar".to_owned(),
            default_index: default_index.map(str::to_owned),
            allowed_indexes: allowed.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    #[test]
    fn test_normalized_appends_default_index() {
        let normalized = spec(Some("audit_index"), &["other_index"]).normalized();
        assert_eq!(normalized.allowed_indexes, vec!["other_index", "audit_index"]);
    }

    #[test]
    fn test_normalized_never_duplicates() {
        let normalized = spec(Some("audit_index"), &["audit_index", "other_index"]).normalized();
        assert_eq!(normalized.allowed_indexes, vec!["audit_index", "other_index"]);
        assert_eq!(normalized.normalized(), normalized);
    }

    #[test]
    fn test_normalized_ignores_missing_or_empty_default() {
        assert!(spec(None, &[]).normalized().allowed_indexes.is_empty());
        assert!(spec(Some(""), &[]).normalized().allowed_indexes.is_empty());
    }

    #[test]
    fn test_same_indexes_is_order_sensitive() {
        let a = spec(Some("x"), &["y", "z"]);
        let mut b = spec(Some("x"), &["z", "y"]);
        assert!(!a.same_indexes(&b));
        b.allowed_indexes.reverse();
        b.name = "other".to_owned();
        assert!(a.same_indexes(&b));
    }

    #[test]
    fn test_spec_serialization_skips_empty_fields() {
        let json = serde_json::to_value(spec(None, &[])).unwrap();
        assert_eq!(json, serde_json::json!({"name": "bar"}));
    }

    #[test]
    fn test_crd_definition() {
        let crd = SplunkToken::crd();
        assert_eq!(crd.spec.group, "splunktoken.managed.openshift.io");
        assert_eq!(crd.spec.names.kind, "SplunkToken");
        assert_eq!(crd.spec.scope, "Namespaced");
        assert_eq!(crd.spec.versions[0].name, "v1alpha1");
    }
}
