//! # Operator Configuration File
//!
//! ```yaml
//! splunkInstance: mystack
//! tokenMaxAge: 30d
//! collectorDomain: splunkcloud.com
//! classicIndexes:
//!   defaultIndex: classic_index
//!   allowedIndexes: [another_classic_index]
//! managementClusterIndexes:
//!   defaultIndex: hcp_index
//!   allowedIndexes: [another_hcp_index]
//! ```

use super::parse_kubernetes_duration;
use crate::constants::{DEFAULT_COLLECTOR_DOMAIN, MANAGEMENT_CLUSTER_TYPE};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;

/// Index settings applied to the tokens of one cluster type
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexConfig {
    #[serde(default)]
    pub default_index: Option<String>,
    #[serde(default)]
    pub allowed_indexes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorConfig {
    /// Splunk Cloud stack name, addressed as a path segment below the ACS host
    pub splunk_instance: String,
    /// Maximum age of a token before it is rotated
    #[serde(deserialize_with = "deserialize_duration")]
    pub token_max_age: Duration,
    /// Domain of the HEC ingestion endpoint written into `outputs.conf`
    #[serde(default = "default_collector_domain")]
    pub collector_domain: String,
    /// ACS endpoint override, for private or mock deployments
    #[serde(default)]
    pub acs_hostname: Option<String>,
    #[serde(default)]
    pub classic_indexes: IndexConfig,
    #[serde(default)]
    pub management_cluster_indexes: IndexConfig,
}

fn default_collector_domain() -> String {
    DEFAULT_COLLECTOR_DOMAIN.to_owned()
}

fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_kubernetes_duration(&raw).map_err(serde::de::Error::custom)
}

impl OperatorConfig {
    /// Load and validate the configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read operator config {}", path.display()))?;
        Self::from_yaml(&raw)
            .with_context(|| format!("Invalid operator config {}", path.display()))
    }

    /// Parse and validate configuration from a YAML document
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(raw).context("Failed to parse YAML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.splunk_instance.trim().is_empty() {
            anyhow::bail!("splunkInstance must not be empty");
        }
        if self.collector_domain.trim().is_empty() {
            anyhow::bail!("collectorDomain must not be empty");
        }
        for (field, indexes) in [
            ("classicIndexes", &self.classic_indexes),
            ("managementClusterIndexes", &self.management_cluster_indexes),
        ] {
            if indexes.allowed_indexes.iter().any(|i| i.trim().is_empty()) {
                anyhow::bail!("{field}.allowedIndexes must not contain empty index names");
            }
        }
        Ok(())
    }

    /// Index settings for a cluster type label value
    ///
    /// `management-cluster` selects the management settings, anything else
    /// (including no label at all) selects the classic settings.
    #[must_use]
    pub fn indexes_for(&self, cluster_type: Option<&str>) -> &IndexConfig {
        if cluster_type == Some(MANAGEMENT_CLUSTER_TYPE) {
            &self.management_cluster_indexes
        } else {
            &self.classic_indexes
        }
    }

    /// URI of the HEC ingestion endpoint for this stack
    #[must_use]
    pub fn collector_uri(&self) -> String {
        format!(
            "https://http-inputs-{}.{}:443",
            self.splunk_instance, self.collector_domain
        )
    }
}
