//! Splunk ACS Mock Server
//!
//! A lightweight Axum-based HTTP server that mocks the Splunk Admin Config
//! Service HTTP Event Collector token API:
//!
//! - `POST /{instance}/adminconfig/v2/inputs/http-event-collectors` creates a token (202, 409 on duplicates)
//! - `GET /{instance}/adminconfig/v2/inputs/http-event-collectors/{name}` reads a token (200, 404)
//! - `DELETE /{instance}/adminconfig/v2/inputs/http-event-collectors/{name}` deletes a token (202, 404)
//!
//! Every ACS route requires `Authorization: Bearer <jwt>`. When the server is
//! started with an expected JWT, only that value is accepted.

pub mod errors;
pub mod store;

use axum::{
    extract::{rejection::JsonRejection, Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use errors::{acs_error_response, codes};
use paths::acs::{COLLECTION_ROUTE, TOKEN_ROUTE};
use serde_json::json;
use store::{StoredToken, TokenSpec, TokenStore};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared application state
#[derive(Debug, Clone, Default)]
pub struct AcsState {
    pub tokens: TokenStore,
    expected_jwt: Option<String>,
}

impl AcsState {
    /// State accepting any bearer token
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State accepting only the given bearer token
    #[must_use]
    pub fn with_jwt(jwt: impl Into<String>) -> Self {
        Self {
            tokens: TokenStore::new(),
            expected_jwt: Some(jwt.into()),
        }
    }
}

/// Build the mock ACS router
pub fn router(state: AcsState) -> Router {
    Router::new()
        .route(COLLECTION_ROUTE, post(create_token))
        .route(TOKEN_ROUTE, get(get_token).delete(delete_token))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

async fn require_bearer(State(state): State<AcsState>, request: Request, next: Next) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|jwt| !jwt.is_empty());

    let authorized = match (presented, state.expected_jwt.as_deref()) {
        (Some(presented), Some(expected)) => presented == expected,
        (Some(_), None) => true,
        (None, _) => false,
    };

    if !authorized {
        warn!("  Rejecting request without a valid bearer token: {}", request.uri());
        return acs_error_response(
            StatusCode::UNAUTHORIZED,
            codes::UNAUTHORIZED,
            "missing or invalid authentication token",
        );
    }
    next.run(request).await
}

fn token_response(status: StatusCode, token: StoredToken) -> Response {
    (status, Json(json!({ "http-event-collector": token }))).into_response()
}

/// POST a new token
async fn create_token(
    State(state): State<AcsState>,
    Path(instance): Path<String>,
    body: Result<Json<TokenSpec>, JsonRejection>,
) -> Response {
    let spec = match body {
        Ok(Json(spec)) => spec,
        Err(rejection) => {
            warn!("  Invalid create request: {}", rejection.body_text());
            return acs_error_response(
                StatusCode::BAD_REQUEST,
                codes::BAD_REQUEST,
                rejection.body_text(),
            );
        }
    };
    if spec.name.is_empty() {
        return acs_error_response(
            StatusCode::BAD_REQUEST,
            codes::BAD_REQUEST,
            "http event collector name is required",
        );
    }
    if let Some(default_index) = &spec.default_index {
        if !spec.allowed_indexes.contains(default_index) {
            return acs_error_response(
                StatusCode::BAD_REQUEST,
                codes::BAD_REQUEST,
                format!("default index {default_index} must be one of the allowed indexes"),
            );
        }
    }

    info!("  CREATE token: instance={}, name={}", instance, spec.name);
    let name = spec.name.clone();
    match state.tokens.insert(&instance, spec).await {
        Some(token) => token_response(StatusCode::ACCEPTED, token),
        None => {
            warn!("  Token already exists: {}/{}", instance, name);
            acs_error_response(
                StatusCode::CONFLICT,
                codes::CONFLICT,
                format!("http event collector {name} already exists"),
            )
        }
    }
}

/// GET a single token
async fn get_token(
    State(state): State<AcsState>,
    Path((instance, name)): Path<(String, String)>,
) -> Response {
    info!("  GET token: instance={}, name={}", instance, name);
    match state.tokens.get(&instance, &name).await {
        Some(token) => token_response(StatusCode::OK, token),
        None => acs_error_response(
            StatusCode::NOT_FOUND,
            codes::NOT_FOUND,
            format!("http event collector {name} not found"),
        ),
    }
}

/// DELETE a single token
async fn delete_token(
    State(state): State<AcsState>,
    Path((instance, name)): Path<(String, String)>,
) -> Response {
    info!("  DELETE token: instance={}, name={}", instance, name);
    if state.tokens.remove(&instance, &name).await {
        (StatusCode::ACCEPTED, Json(json!({}))).into_response()
    } else {
        acs_error_response(
            StatusCode::NOT_FOUND,
            codes::NOT_FOUND,
            format!("http event collector {name} not found"),
        )
    }
}
