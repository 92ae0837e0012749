//! # Reconcile Context
//!
//! Everything a reconcile pass needs, shared by `Arc` between passes.

use crate::config::{ControllerConfig, OperatorConfig};
use crate::crd::hive::{ClusterDeployment, SyncSet};
use crate::crd::SplunkToken;
use crate::splunk::TokenManager;
use crate::store::{KubeStore, ObjectStore};
use k8s_openapi::api::core::v1::Secret;
use std::sync::Arc;

pub struct Context {
    pub tokens: Arc<dyn ObjectStore<SplunkToken>>,
    pub secrets: Arc<dyn ObjectStore<Secret>>,
    pub cluster_deployments: Arc<dyn ObjectStore<ClusterDeployment>>,
    pub sync_sets: Arc<dyn ObjectStore<SyncSet>>,
    pub splunk: Arc<dyn TokenManager>,
    pub operator: OperatorConfig,
    pub controller: ControllerConfig,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("operator", &self.operator)
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Context backed by the Kubernetes API
    #[must_use]
    pub fn new(
        client: kube::Client,
        splunk: Arc<dyn TokenManager>,
        operator: OperatorConfig,
        controller: ControllerConfig,
    ) -> Self {
        let store = KubeStore::new(client);
        Self {
            tokens: Arc::new(store.clone()),
            secrets: Arc::new(store.clone()),
            cluster_deployments: Arc::new(store.clone()),
            sync_sets: Arc::new(store),
            splunk,
            operator,
            controller,
        }
    }
}
