//! Shared reconciler test fixtures

use super::Context;
use crate::config::{ControllerConfig, IndexConfig, OperatorConfig};
use crate::constants::{CLUSTER_ID_LABEL, TOKEN_OBJECT_NAME};
use crate::crd::hive::{ClusterDeployment, ClusterDeploymentSpec};
use crate::crd::time::from_utc;
use crate::crd::{SplunkToken, SplunkTokenSpec};
use crate::splunk::{HecToken, MockTokenManager};
use crate::store::{MemoryStore, ObjectStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

pub const NAMESPACE: &str = "uhc-test-1234";
pub const CLUSTER_ID: &str = "2b2b9f9a-0c7d-4c1d-9d0e-6b7c1a3e8f11";
pub const MAX_AGE: Duration = Duration::from_secs(30 * 86_400);

pub fn operator_config() -> OperatorConfig {
    OperatorConfig {
        splunk_instance: "<splunk-collector-uri>".to_owned(),
        token_max_age: MAX_AGE,
        collector_domain: "splunkcloud.com".to_owned(),
        acs_hostname: None,
        classic_indexes: IndexConfig {
            default_index: Some("classic_index".to_owned()),
            allowed_indexes: vec!["another_classic_index".to_owned()],
        },
        management_cluster_indexes: IndexConfig {
            default_index: Some("hcp_index".to_owned()),
            allowed_indexes: vec!["another_hcp_index".to_owned()],
        },
    }
}

pub fn context(store: &MemoryStore, splunk: MockTokenManager) -> Context {
    Context {
        tokens: Arc::new(store.clone()),
        secrets: Arc::new(store.clone()),
        cluster_deployments: Arc::new(store.clone()),
        sync_sets: Arc::new(store.clone()),
        splunk: Arc::new(splunk),
        operator: operator_config(),
        controller: ControllerConfig::default(),
    }
}

pub fn cluster_deployment(labels: &[(&str, &str)]) -> ClusterDeployment {
    let mut cd = ClusterDeployment::new(
        "test-cluster",
        ClusterDeploymentSpec {
            cluster_name: "test-cluster".to_owned(),
            base_domain: "example.com".to_owned(),
            installed: true,
        },
    );
    cd.metadata.namespace = Some(NAMESPACE.to_owned());
    cd.metadata.labels = Some(
        labels
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect::<BTreeMap<_, _>>(),
    );
    cd
}

pub fn identified_cluster_deployment() -> ClusterDeployment {
    cluster_deployment(&[(CLUSTER_ID_LABEL, CLUSTER_ID)])
}

pub fn token_spec() -> SplunkTokenSpec {
    SplunkTokenSpec {
        name: CLUSTER_ID.to_owned(),
        default_index: Some("classic_index".to_owned()),
        allowed_indexes: vec!["another_classic_index".to_owned()],
    }
}

/// A SplunkToken created at `created`
pub fn splunk_token(created: DateTime<Utc>) -> SplunkToken {
    let mut token = SplunkToken::new(TOKEN_OBJECT_NAME, token_spec());
    token.metadata.namespace = Some(NAMESPACE.to_owned());
    token.metadata.creation_timestamp = Some(from_utc(created).unwrap());
    token
}

pub fn hec_token(spec: &SplunkTokenSpec, value: &str) -> HecToken {
    HecToken {
        spec: spec.normalized(),
        value: value.to_owned(),
    }
}

/// Store whose reads always miss, as if another pass created the object
/// between this pass's check and its create
pub struct StaleReads(pub MemoryStore);

#[async_trait]
impl<K> ObjectStore<K> for StaleReads
where
    K: Send + Sync + 'static,
    MemoryStore: ObjectStore<K>,
{
    async fn get(&self, _namespace: &str, _name: &str) -> Result<Option<K>, StoreError> {
        Ok(None)
    }

    async fn create(&self, object: &K) -> Result<K, StoreError> {
        ObjectStore::<K>::create(&self.0, object).await
    }

    async fn replace(&self, object: &K) -> Result<K, StoreError> {
        ObjectStore::<K>::replace(&self.0, object).await
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), StoreError> {
        ObjectStore::<K>::delete(&self.0, namespace, name).await
    }
}
