//! # Error Policy
//!
//! Decides what happens after a failed reconcile pass. Every failure is
//! logged, counted, and retried after the configured error requeue delay.

use crate::controller::{cluster_deployment, splunk_token, Context, ReconcileError};
use crate::crd::hive::ClusterDeployment;
use crate::crd::SplunkToken;
use crate::observability::metrics;
use kube::{Resource, ResourceExt};
use kube_runtime::controller::Action;
use std::sync::Arc;
use tracing::error;

fn requeue_after_error<K: Resource>(
    controller: &'static str,
    object: &K,
    error: &ReconcileError,
    ctx: &Context,
) -> Action {
    let reason = error.metric_label();
    let namespace = object.namespace().unwrap_or_default();
    let name = object.name_any();
    error!(
        controller,
        resource.namespace = %namespace,
        resource.name = %name,
        reason,
        "Reconciliation failed: {error}"
    );
    metrics::increment_reconciliation_errors(controller);
    metrics::increment_requeues_total(controller, reason);
    Action::requeue(ctx.controller.error_requeue)
}

/// Error policy for the SplunkToken controller
pub fn token_error_policy(
    token: Arc<SplunkToken>,
    error: &ReconcileError,
    ctx: Arc<Context>,
) -> Action {
    requeue_after_error(splunk_token::CONTROLLER, token.as_ref(), error, &ctx)
}

/// Error policy for the ClusterDeployment controller
pub fn cluster_deployment_error_policy(
    cluster_deployment: Arc<ClusterDeployment>,
    error: &ReconcileError,
    ctx: Arc<Context>,
) -> Action {
    requeue_after_error(
        cluster_deployment::CONTROLLER,
        cluster_deployment.as_ref(),
        error,
        &ctx,
    )
}
