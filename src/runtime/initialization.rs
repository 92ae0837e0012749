//! # Initialization
//!
//! Operator startup: rustls provider, tracing, metrics, the HTTP server,
//! the Kubernetes client and the ACS client.

use super::server::{start_server, ServerState};
use crate::config::{load_config, OperatorConfig, ServerConfig};
use crate::controller::Context;
use crate::splunk::SplunkClient;
use anyhow::{anyhow, Context as _, Result};
use kube::Client;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};
use zeroize::Zeroizing;

/// Everything the watch loop needs
pub struct InitializationResult {
    pub client: Client,
    pub context: Arc<Context>,
    pub server_state: Arc<ServerState>,
}

/// Install the rustls crypto provider and the tracing subscriber
///
/// Must run before any TLS connection is made.
pub fn init_process() {
    // Err means a provider is already installed
    let _ = rustls::crypto::ring::default_provider().install_default();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "splunk_token_operator=info".into()),
        )
        .init();
}

/// Start the operator runtime
///
/// `auth_token` is the ACS bearer JWT; it is moved into the client and wiped
/// from memory on drop.
///
/// # Errors
/// Fails on an invalid configuration file, an empty JWT, a server that does
/// not come up, or an unreachable Kubernetes API.
pub async fn initialize(
    config_path: &Path,
    auth_token: Zeroizing<String>,
) -> Result<InitializationResult> {
    info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let operator = OperatorConfig::load(config_path)?;
    let (controller, server) = load_config();
    info!(
        splunk_instance = %operator.splunk_instance,
        token_max_age_secs = operator.token_max_age.as_secs(),
        "Loaded operator configuration from {}",
        config_path.display()
    );

    let splunk = match operator.acs_hostname.as_deref() {
        Some(base_url) => SplunkClient::with_base_url(base_url, &operator.splunk_instance, &auth_token),
        None => SplunkClient::new(&operator.splunk_instance, &auth_token),
    }
    .context("Failed to create Splunk ACS client")?
    .with_request_timeout(controller.http_request_timeout);
    drop(auth_token);

    crate::observability::metrics::register_metrics()?;

    let server_state = Arc::new(ServerState::default());
    let server_handle = {
        let state = Arc::clone(&server_state);
        let port = server.metrics_port;
        tokio::spawn(async move {
            if let Err(e) = start_server(port, state).await {
                error!("HTTP server error: {e:#}");
            }
        })
    };
    wait_for_server_ready(&server, &server_state, &server_handle).await?;

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;
    let context = Arc::new(Context::new(
        client.clone(),
        Arc::new(splunk),
        operator,
        controller,
    ));

    info!("Operator initialized, starting watch loop");
    Ok(InitializationResult {
        client,
        context,
        server_state,
    })
}

/// Wait for the HTTP server to bind
async fn wait_for_server_ready(
    config: &ServerConfig,
    server_state: &ServerState,
    server_handle: &tokio::task::JoinHandle<()>,
) -> Result<()> {
    let startup_timeout = Duration::from_secs(config.startup_timeout_secs);
    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    let start_time = Instant::now();

    loop {
        if server_handle.is_finished() {
            return Err(anyhow!("HTTP server failed to start"));
        }
        if server_state.is_ready.load(Ordering::Relaxed) {
            info!("HTTP server is ready and accepting connections");
            return Ok(());
        }
        if start_time.elapsed() > startup_timeout {
            return Err(anyhow!(
                "HTTP server failed to become ready within {} seconds",
                startup_timeout.as_secs()
            ));
        }
        tokio::time::sleep(poll_interval).await;
    }
}
