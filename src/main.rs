//! # Splunk Token Operator
//!
//! Binary entry point. See the library crate for an overview.

use anyhow::Result;
use clap::Parser;
use splunk_token_operator::constants::DEFAULT_CONFIG_PATH;
use splunk_token_operator::runtime::{init_process, initialize, run_watch_loop};
use std::path::PathBuf;
use zeroize::Zeroizing;

/// Provisions and rotates Splunk HEC tokens for Hive ClusterDeployments
#[derive(Parser)]
#[command(name = "splunk-token-operator", version, about)]
struct Args {
    /// Path to the operator configuration file
    #[arg(long, env = "OPERATOR_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Bearer JWT for the Splunk Admin Config Service
    #[arg(long, env = "SPLUNK_AUTH_TOKEN", hide_env_values = true)]
    splunk_auth_token: String,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("config", &self.config)
            .field("splunk_auth_token", &"<redacted>")
            .finish()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        config,
        splunk_auth_token,
    } = Args::parse();
    init_process();

    let init = initialize(&config, Zeroizing::new(splunk_auth_token)).await?;
    run_watch_loop(init.client, init.context, init.server_state).await;

    Ok(())
}
