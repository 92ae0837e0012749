//! # ACS HEC Token Client
//!
//! REST client for `adminconfig/v2/inputs/http-event-collectors`.
//!
//! - Create is a POST of the token spec; 409 means the token already exists
//!   and is treated like success. Either way the token is read back, since
//!   only a read returns the token value.
//! - Delete treats 404 as success.
//! - Any other status >= 400 carries a `{"code","message"}` body.

use super::{HecToken, SplunkError, TokenManager};
use crate::crd::SplunkTokenSpec;
use crate::observability::metrics;
use async_trait::async_trait;
use paths::acs::{collection_url, token_url, ACS_HOSTNAME};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, Instrument};
use zeroize::Zeroizing;

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default, rename = "http-event-collector")]
    data: HecToken,
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default, alias = "Code")]
    code: String,
    #[serde(default, alias = "Message")]
    message: String,
}

/// Splunk ACS client bound to one stack
pub struct SplunkClient {
    http: reqwest::Client,
    collection_url: String,
    jwt: Zeroizing<String>,
    request_timeout: Option<Duration>,
}

impl std::fmt::Debug for SplunkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplunkClient")
            .field("collection_url", &self.collection_url)
            .field("jwt", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl SplunkClient {
    /// Create a client for a Splunk Cloud stack on the public ACS endpoint
    ///
    /// # Errors
    /// Fails without any network call if the instance or JWT is empty.
    pub fn new(instance: &str, jwt: &str) -> Result<Self, SplunkError> {
        Self::with_base_url(ACS_HOSTNAME, instance, jwt)
    }

    /// Create a client against a specific ACS endpoint
    ///
    /// # Errors
    /// Fails without any network call if the instance or JWT is empty.
    pub fn with_base_url(base_url: &str, instance: &str, jwt: &str) -> Result<Self, SplunkError> {
        if instance.is_empty() {
            return Err(SplunkError::MissingInstance);
        }
        if jwt.is_empty() {
            return Err(SplunkError::MissingAuthToken);
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            collection_url: collection_url(base_url, instance),
            jwt: Zeroizing::new(jwt.to_owned()),
            request_timeout: None,
        })
    }

    /// Bound every ACS request by `timeout`
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// URL of the stack's token collection
    #[must_use]
    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url).bearer_auth(self.jwt.as_str());
        match self.request_timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    async fn get_token(&self, name: &str) -> Result<HecToken, SplunkError> {
        let response = self
            .request(Method::GET, &token_url(&self.collection_url, name))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let status = response.status();
        if is_error(status) {
            return Err(remote_error(response).await);
        }
        let body = response.bytes().await?;
        let decoded: TokenResponse =
            serde_json::from_slice(&body).map_err(|source| SplunkError::Decode {
                status: status.as_u16(),
                source,
            })?;
        Ok(decoded.data)
    }
}

fn is_error(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}

/// Turn an error response into a [`SplunkError`]
async fn remote_error(response: Response) -> SplunkError {
    let status = response.status().as_u16();
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => return SplunkError::Transport(e),
    };
    match serde_json::from_slice::<ErrorResponse>(&body) {
        Ok(error) => SplunkError::Remote {
            status,
            code: error.code,
            message: error.message,
        },
        Err(source) => SplunkError::Decode { status, source },
    }
}

fn record<T>(operation: &str, start: Instant, result: &Result<T, SplunkError>) {
    metrics::record_hec_operation(operation, result.is_ok(), start.elapsed().as_secs_f64());
}

#[async_trait]
impl TokenManager for SplunkClient {
    async fn create_token(&self, spec: &SplunkTokenSpec) -> Result<HecToken, SplunkError> {
        let spec = spec.normalized();
        let span = info_span!("splunk.hec.token.create", token.name = %spec.name);
        let start = Instant::now();

        let result: Result<HecToken, SplunkError> = async {
            let response = self
                .request(Method::POST, &self.collection_url)
                .json(&spec)
                .send()
                .await?;
            let status = response.status();
            if status == StatusCode::CONFLICT {
                debug!("HEC token {} already exists, reading it back", spec.name);
            } else if is_error(status) {
                return Err(remote_error(response).await);
            } else {
                info!("Created HEC token {}", spec.name);
            }
            self.get_token(&spec.name).await
        }
        .instrument(span)
        .await;

        record("create", start, &result);
        result
    }

    async fn read_token(&self, name: &str) -> Result<HecToken, SplunkError> {
        let span = info_span!("splunk.hec.token.read", token.name = %name);
        let start = Instant::now();
        let result = self.get_token(name).instrument(span).await;
        record("read", start, &result);
        result
    }

    async fn delete_token(&self, name: &str) -> Result<(), SplunkError> {
        let span = info_span!("splunk.hec.token.delete", token.name = %name);
        let start = Instant::now();

        let result: Result<(), SplunkError> = async {
            let response = self
                .request(Method::DELETE, &token_url(&self.collection_url, name))
                .send()
                .await?;
            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                debug!("HEC token {} already gone", name);
                Ok(())
            } else if status.is_success() {
                info!("Deleted HEC token {}", name);
                Ok(())
            } else {
                Err(remote_error(response).await)
            }
        }
        .instrument(span)
        .await;

        record("delete", start, &result);
        result
    }
}
