//! # ClusterDeployment Reconciler
//!
//! Makes sure every Hive ClusterDeployment has:
//!
//! - a SplunkToken named `cluster`, whose token name is the cluster's
//!   `api.openshift.com/id` label and whose indexes come from the operator
//!   configuration for the cluster's type
//! - a SyncSet copying the token Secret onto the managed cluster
//!
//! Both are owned by the ClusterDeployment and go away with it.

use super::{Context, ReconcileError};
use crate::constants::{
    CLUSTER_ID_LABEL, CLUSTER_TYPE_LABEL, SYNC_SET_NAME, SYNC_TARGET_NAMESPACE,
    SYNC_TARGET_SECRET_NAME, TOKEN_OBJECT_NAME, TOKEN_SECRET_NAME,
};
use crate::crd::hive::{
    ClusterDeployment, ClusterDeploymentRef, SecretMapping, SecretReference, SyncSet, SyncSetSpec,
};
use crate::crd::{SplunkToken, SplunkTokenSpec};
use crate::observability::metrics;
use crate::store::StoreError;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::runtime::controller::Action;
use kube::{Resource, ResourceExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Controller name used in metrics
pub const CONTROLLER: &str = "clusterdeployment";

/// What happened to the cluster's SplunkToken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenChange {
    Created,
    Updated,
    Unchanged,
    /// The SplunkToken is being deleted for rotation; it is recreated once gone
    Rotating,
}

/// Result of one reconcile pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterOutcome {
    /// The ClusterDeployment does not exist
    Missing,
    Reconciled {
        token: TokenChange,
        sync_set_created: bool,
    },
}

impl ClusterOutcome {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Reconciled { token, .. } => match token {
                TokenChange::Created => "token_created",
                TokenChange::Updated => "token_updated",
                TokenChange::Unchanged => "unchanged",
                TokenChange::Rotating => "token_rotating",
            },
        }
    }
}

/// Token spec for a ClusterDeployment
///
/// # Errors
/// Fails if the cluster ID label is missing.
pub fn desired_token_spec(
    ctx: &Context,
    cluster_deployment: &ClusterDeployment,
) -> Result<SplunkTokenSpec, ReconcileError> {
    let labels = cluster_deployment.labels();
    let name = labels
        .get(CLUSTER_ID_LABEL)
        .ok_or(ReconcileError::LabelMissing(CLUSTER_ID_LABEL))?;
    let cluster_type = labels.get(CLUSTER_TYPE_LABEL).map(String::as_str);
    let indexes = ctx.operator.indexes_for(cluster_type);
    debug!(
        cluster_type = cluster_type.unwrap_or("classic"),
        "Selected index configuration"
    );
    Ok(SplunkTokenSpec {
        name: name.clone(),
        default_index: indexes.default_index.clone(),
        allowed_indexes: indexes.allowed_indexes.clone(),
    })
}

/// Replace any controller reference with `owner`, keeping other owners
fn set_controller_reference(object: &mut impl Resource, owner: OwnerReference) {
    let references = object.meta_mut().owner_references.get_or_insert_with(Vec::new);
    references.retain(|r| r.controller != Some(true) && r.uid != owner.uid);
    references.push(owner);
}

/// Run one reconcile pass for the ClusterDeployment `namespace/name`
#[instrument(skip(ctx), fields(controller = CONTROLLER))]
pub async fn reconcile_cluster_deployment(
    ctx: &Context,
    namespace: &str,
    name: &str,
) -> Result<ClusterOutcome, ReconcileError> {
    let Some(cluster_deployment) = ctx.cluster_deployments.get(namespace, name).await? else {
        debug!("ClusterDeployment not found");
        return Ok(ClusterOutcome::Missing);
    };

    let desired = desired_token_spec(ctx, &cluster_deployment)?;
    let owner = cluster_deployment
        .controller_owner_ref(&())
        .ok_or(ReconcileError::MissingMetadata {
            kind: "ClusterDeployment",
            field: "uid",
        })?;

    let token = match ctx.tokens.get(namespace, TOKEN_OBJECT_NAME).await? {
        None => {
            info!("SplunkToken does not exist, creating it");
            let mut token = SplunkToken::new(TOKEN_OBJECT_NAME, desired);
            token.metadata.namespace = Some(namespace.to_owned());
            set_controller_reference(&mut token, owner.clone());
            match ctx.tokens.create(&token).await {
                Ok(_) => TokenChange::Created,
                Err(StoreError::AlreadyExists { .. }) => TokenChange::Unchanged,
                Err(e) => return Err(e.into()),
            }
        }
        Some(existing) if existing.metadata.deletion_timestamp.is_some() => {
            debug!("SplunkToken is being deleted, waiting for it to go away");
            TokenChange::Rotating
        }
        Some(existing) if existing.spec.same_indexes(&desired) => {
            debug!("SplunkToken spec is unchanged");
            TokenChange::Unchanged
        }
        Some(mut existing) => {
            info!("SplunkToken indexes changed, updating it");
            existing.spec = desired;
            set_controller_reference(&mut existing, owner.clone());
            ctx.tokens.replace(&existing).await?;
            TokenChange::Updated
        }
    };

    let sync_set_created = ensure_sync_set(ctx, namespace, name, owner).await?;
    Ok(ClusterOutcome::Reconciled {
        token,
        sync_set_created,
    })
}

/// Create the SyncSet pushing the token Secret to the managed cluster unless it exists
async fn ensure_sync_set(
    ctx: &Context,
    namespace: &str,
    cluster_deployment: &str,
    owner: OwnerReference,
) -> Result<bool, ReconcileError> {
    if ctx.sync_sets.get(namespace, SYNC_SET_NAME).await?.is_some() {
        return Ok(false);
    }

    let mut sync_set = SyncSet::new(
        SYNC_SET_NAME,
        SyncSetSpec {
            cluster_deployment_refs: vec![ClusterDeploymentRef {
                name: cluster_deployment.to_owned(),
            }],
            resource_apply_mode: Some("Sync".to_owned()),
            secret_mappings: vec![SecretMapping {
                source_ref: SecretReference {
                    name: TOKEN_SECRET_NAME.to_owned(),
                    namespace: Some(namespace.to_owned()),
                },
                target_ref: SecretReference {
                    name: SYNC_TARGET_SECRET_NAME.to_owned(),
                    namespace: Some(SYNC_TARGET_NAMESPACE.to_owned()),
                },
            }],
        },
    );
    sync_set.metadata.namespace = Some(namespace.to_owned());
    set_controller_reference(&mut sync_set, owner);

    match ctx.sync_sets.create(&sync_set).await {
        Ok(_) => {
            info!("Created SyncSet {}", SYNC_SET_NAME);
            Ok(true)
        }
        Err(StoreError::AlreadyExists { .. }) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// kube-runtime entry point for ClusterDeployment events
pub async fn reconcile(
    cluster_deployment: Arc<ClusterDeployment>,
    ctx: Arc<Context>,
) -> Result<Action, ReconcileError> {
    let namespace = cluster_deployment
        .namespace()
        .ok_or(ReconcileError::MissingMetadata {
            kind: "ClusterDeployment",
            field: "namespace",
        })?;
    let name = cluster_deployment.name_any();
    let timeout = ctx.controller.reconcile_timeout;
    let start = Instant::now();
    metrics::increment_reconciliations(CONTROLLER);

    let outcome = tokio::time::timeout(
        timeout,
        reconcile_cluster_deployment(&ctx, &namespace, &name),
    )
    .await
    .map_err(|_elapsed| ReconcileError::Timeout(timeout))??;

    metrics::observe_reconciliation_duration(CONTROLLER, start.elapsed().as_secs_f64());
    metrics::increment_reconcile_outcome(CONTROLLER, outcome.as_str());
    info!(
        resource.namespace = %namespace,
        resource.name = %name,
        outcome = outcome.as_str(),
        "ClusterDeployment reconciled"
    );

    Ok(match outcome {
        ClusterOutcome::Missing => Action::await_change(),
        ClusterOutcome::Reconciled { .. } => Action::requeue(ctx.controller.resync_interval),
    })
}
