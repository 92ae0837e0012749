//! # SplunkToken Reconciler
//!
//! Drives one SplunkToken through its lifecycle. Each pass takes exactly one
//! step, in this order:
//!
//! 1. **Gone** - nothing to do.
//! 2. **Deleting** - delete the HEC token in Splunk, then release the finalizer.
//! 3. **Expired** - older than `tokenMaxAge`: delete the SplunkToken itself.
//!    The remote token is removed by step 2 on a later pass, and the
//!    ClusterDeployment reconciler creates a fresh SplunkToken afterwards.
//! 4. **No Secret** - add the finalizer, create the HEC token and store it in
//!    an immutable Secret owned by the SplunkToken.
//!
//! The finalizer is persisted before the HEC token is created, so a token
//! that exists in Splunk always has a finalizer guarding its cleanup.

use super::secret::{controller_uid, token_secret};
use super::{Context, ReconcileError};
use crate::constants::{TOKEN_FINALIZER, TOKEN_SECRET_NAME};
use crate::crd::time::to_utc;
use crate::crd::SplunkToken;
use crate::observability::metrics;
use crate::store::StoreError;
use chrono::{DateTime, Utc};
use kube::runtime::controller::Action;
use kube::ResourceExt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Controller name used in metrics
pub const CONTROLLER: &str = "splunktoken";

/// Delay before checking again whether a previous token's Secret was collected
const STALE_SECRET_REQUEUE: Duration = Duration::from_secs(5);

/// Result of one reconcile pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenOutcome {
    /// The SplunkToken does not exist
    Missing,
    /// The HEC token was deleted and the finalizer released
    Released,
    /// The SplunkToken exceeded its maximum age and its deletion was requested
    RotationRequested,
    /// The Secret still belongs to a previous SplunkToken and awaits garbage collection
    StaleSecret,
    /// The Secret exists; the token is due for rotation in `rotate_in`
    Converged { rotate_in: Duration },
    /// A HEC token was created and stored; it is due for rotation in `rotate_in`
    Created { rotate_in: Duration },
}

impl TokenOutcome {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Released => "released",
            Self::RotationRequested => "rotation_requested",
            Self::StaleSecret => "stale_secret",
            Self::Converged { .. } => "converged",
            Self::Created { .. } => "created",
        }
    }

    /// When to look at the SplunkToken again without a watch event
    #[must_use]
    pub fn requeue_after(&self) -> Option<Duration> {
        match self {
            Self::Missing | Self::Released | Self::RotationRequested => None,
            Self::StaleSecret => Some(STALE_SECRET_REQUEUE),
            Self::Converged { rotate_in } | Self::Created { rotate_in } => Some(*rotate_in),
        }
    }
}

fn add_finalizer(token: &mut SplunkToken) -> bool {
    let finalizers = token.finalizers_mut();
    if finalizers.iter().any(|f| f == TOKEN_FINALIZER) {
        return false;
    }
    finalizers.push(TOKEN_FINALIZER.to_owned());
    true
}

fn remove_finalizer(token: &mut SplunkToken) -> bool {
    let finalizers = token.finalizers_mut();
    let before = finalizers.len();
    finalizers.retain(|f| f != TOKEN_FINALIZER);
    finalizers.len() != before
}

/// Run one reconcile pass for the SplunkToken `namespace/name` at time `now`
#[instrument(skip(ctx, now), fields(controller = CONTROLLER))]
pub async fn reconcile_token(
    ctx: &Context,
    namespace: &str,
    name: &str,
    now: DateTime<Utc>,
) -> Result<TokenOutcome, ReconcileError> {
    let Some(mut token) = ctx.tokens.get(namespace, name).await? else {
        debug!("SplunkToken not found");
        return Ok(TokenOutcome::Missing);
    };

    if token.metadata.deletion_timestamp.is_some() {
        info!(
            "SplunkToken has deletion timestamp, deleting HEC token {} from Splunk",
            token.spec.name
        );
        ctx.splunk.delete_token(&token.spec.name).await?;
        if remove_finalizer(&mut token) {
            ctx.tokens.replace(&token).await?;
            info!("Finalizer removed from SplunkToken");
        }
        return Ok(TokenOutcome::Released);
    }

    let created = token
        .metadata
        .creation_timestamp
        .as_ref()
        .and_then(to_utc)
        .ok_or(ReconcileError::MissingMetadata {
            kind: "SplunkToken",
            field: "creationTimestamp",
        })?;
    let age = (now - created).to_std().unwrap_or_default();
    let max_age = ctx.operator.token_max_age;
    if age > max_age {
        info!(
            "SplunkToken is {}s old (maximum {}s), requesting rotation",
            age.as_secs(),
            max_age.as_secs()
        );
        ctx.tokens.delete(namespace, name).await?;
        return Ok(TokenOutcome::RotationRequested);
    }
    // One second past the deadline, since rotation needs the age to exceed the maximum
    let rotate_in = max_age
        .saturating_sub(age)
        .saturating_add(Duration::from_secs(1));

    if let Some(secret) = ctx.secrets.get(namespace, TOKEN_SECRET_NAME).await? {
        let owner = controller_uid(&secret);
        if owner.is_some() && owner != token.uid().as_deref() {
            warn!(
                "Secret {} still belongs to a previous SplunkToken, waiting for garbage collection",
                TOKEN_SECRET_NAME
            );
            return Ok(TokenOutcome::StaleSecret);
        }
        debug!("Token Secret present, nothing to do");
        return Ok(TokenOutcome::Converged { rotate_in });
    }

    info!("Token Secret not found, requesting new HEC token from Splunk");
    if add_finalizer(&mut token) {
        token = ctx.tokens.replace(&token).await?;
        info!("Finalizer added to SplunkToken");
    }

    let hec_token = ctx.splunk.create_token(&token.spec).await?;
    let secret = token_secret(&token, &hec_token.value, &ctx.operator.collector_uri())?;
    match ctx.secrets.create(&secret).await {
        Ok(_) => info!("Created Secret {}", TOKEN_SECRET_NAME),
        Err(StoreError::AlreadyExists { .. }) => {
            debug!("Secret {} created by a concurrent pass", TOKEN_SECRET_NAME);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(TokenOutcome::Created { rotate_in })
}

/// kube-runtime entry point for SplunkToken events
pub async fn reconcile(token: Arc<SplunkToken>, ctx: Arc<Context>) -> Result<Action, ReconcileError> {
    let namespace = token.namespace().ok_or(ReconcileError::MissingMetadata {
        kind: "SplunkToken",
        field: "namespace",
    })?;
    let name = token.name_any();
    let timeout = ctx.controller.reconcile_timeout;
    let start = Instant::now();
    metrics::increment_reconciliations(CONTROLLER);

    let outcome = tokio::time::timeout(
        timeout,
        reconcile_token(&ctx, &namespace, &name, Utc::now()),
    )
    .await
    .map_err(|_elapsed| ReconcileError::Timeout(timeout))??;

    metrics::observe_reconciliation_duration(CONTROLLER, start.elapsed().as_secs_f64());
    metrics::increment_reconcile_outcome(CONTROLLER, outcome.as_str());
    info!(
        resource.namespace = %namespace,
        resource.name = %name,
        outcome = outcome.as_str(),
        "SplunkToken reconciled"
    );

    Ok(match outcome.requeue_after() {
        Some(after) => Action::requeue(after.min(ctx.controller.resync_interval)),
        None => Action::await_change(),
    })
}
