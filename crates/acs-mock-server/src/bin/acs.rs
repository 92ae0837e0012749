//! Splunk ACS Mock Server binary
//!
//! Environment Variables:
//! - PORT: Port to listen on (default: 1234)
//! - ACS_EXPECTED_JWT: Only accept this bearer token (default: accept any)

use acs_mock_server::{router, AcsState};
use std::env;
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "acs_mock_server=info,tower_http=info".into()),
        )
        .with_target(false)
        .init();

    let port = env::var("PORT")
        .unwrap_or_else(|_| "1234".to_string())
        .parse::<u16>()?;

    let state = match env::var("ACS_EXPECTED_JWT") {
        Ok(jwt) if !jwt.is_empty() => AcsState::with_jwt(jwt),
        _ => AcsState::new(),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting Splunk ACS Mock Server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
