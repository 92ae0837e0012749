//! # Watch Loop
//!
//! Runs both controllers until a shutdown signal arrives:
//!
//! - SplunkToken, also triggered by changes to the Secrets it owns
//! - ClusterDeployment, also triggered by changes to the SplunkTokens and
//!   SyncSets it owns, so a token deleted for rotation is recreated at once

use super::error_policy::{cluster_deployment_error_policy, token_error_policy};
use super::server::ServerState;
use crate::constants::OPERATOR_NAME;
use crate::controller::{cluster_deployment, splunk_token, Context, ReconcileError};
use crate::crd::hive::{ClusterDeployment, SyncSet};
use crate::crd::SplunkToken;
use futures::StreamExt;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client, Resource};
use kube_runtime::controller::{Action, Error as ControllerError};
use kube_runtime::reflector::ObjectRef;
use kube_runtime::{watcher, Controller};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, info, warn};

type ReconcileResult<K> =
    Result<(ObjectRef<K>, Action), ControllerError<ReconcileError, watcher::Error>>;

/// Log the result of one reconcile as reported by the controller stream
fn log_result<K: Resource>(
    controller: &'static str,
) -> impl Fn(ReconcileResult<K>) -> futures::future::Ready<()> {
    move |result| {
        match result {
            Ok((object, action)) => debug!(
                controller,
                resource.namespace = object.namespace.as_deref().unwrap_or_default(),
                resource.name = %object.name,
                ?action,
                "Reconcile finished"
            ),
            // already logged by the error policy
            Err(ControllerError::ReconcilerFailed(..)) => {}
            Err(e) => warn!(controller, "Controller stream error: {e}"),
        }
        futures::future::ready(())
    }
}

/// Run both controllers until a shutdown signal stops them
pub async fn run_watch_loop(client: Client, ctx: Arc<Context>, server_state: Arc<ServerState>) {
    let managed_secrets =
        watcher::Config::default().labels(&format!("app.kubernetes.io/managed-by={OPERATOR_NAME}"));

    let tokens = Controller::new(
        Api::<SplunkToken>::all(client.clone()),
        watcher::Config::default(),
    )
    .owns(Api::<Secret>::all(client.clone()), managed_secrets)
    .shutdown_on_signal()
    .run(splunk_token::reconcile, token_error_policy, Arc::clone(&ctx))
    .for_each(log_result(splunk_token::CONTROLLER));

    let cluster_deployments = Controller::new(
        Api::<ClusterDeployment>::all(client.clone()),
        watcher::Config::default(),
    )
    .owns(Api::<SplunkToken>::all(client.clone()), watcher::Config::default())
    .owns(Api::<SyncSet>::all(client), watcher::Config::default())
    .shutdown_on_signal()
    .run(
        cluster_deployment::reconcile,
        cluster_deployment_error_policy,
        ctx,
    )
    .for_each(log_result(cluster_deployment::CONTROLLER));

    info!("Starting SplunkToken and ClusterDeployment controllers");
    tokio::join!(tokens, cluster_deployments);

    server_state.is_ready.store(false, Ordering::Relaxed);
    info!("Controllers stopped, shutting down");
}
