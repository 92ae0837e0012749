//! SplunkClient against scripted ACS endpoints
//!
//! Each test starts a throwaway axum server on a random local port whose
//! handlers return canned responses and record what the client sent.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use splunk_token_operator::crd::SplunkTokenSpec;
use splunk_token_operator::splunk::{SplunkClient, SplunkError, TokenManager};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const INSTANCE: &str = "mock_splunk";
const JWT: &str = "test-jwt";
const COLLECTION: &str = "/mock_splunk/adminconfig/v2/inputs/http-event-collectors";

/// What the scripted server answers and what it saw
#[derive(Debug, Default)]
struct Script {
    create_status: u16,
    create_body: Value,
    read_status: u16,
    read_body: Value,
    delete_status: u16,
    delete_body: Value,
    seen_bodies: Vec<Value>,
    seen_headers: Vec<HeaderMap>,
    seen_deletes: Vec<String>,
}

type Shared = Arc<Mutex<Script>>;

fn reply(status: u16, body: &Value) -> Response {
    let status = StatusCode::from_u16(status).unwrap();
    (status, Json(body.clone())).into_response()
}

async fn create(State(script): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut script = script.lock().unwrap();
    script.seen_bodies.push(body);
    script.seen_headers.push(headers);
    reply(script.create_status, &script.create_body)
}

async fn read(State(script): State<Shared>, headers: HeaderMap) -> Response {
    let mut script = script.lock().unwrap();
    script.seen_headers.push(headers);
    reply(script.read_status, &script.read_body)
}

async fn delete(State(script): State<Shared>, Path(name): Path<String>) -> Response {
    let mut script = script.lock().unwrap();
    script.seen_deletes.push(name);
    reply(script.delete_status, &script.delete_body)
}

async fn serve(script: Script) -> (SplunkClient, Shared) {
    let shared = Arc::new(Mutex::new(script));
    let app = Router::new()
        .route(COLLECTION, post(create))
        .route(&format!("{COLLECTION}/{{name}}"), get(read).delete(delete))
        .with_state(Arc::clone(&shared));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let client = SplunkClient::with_base_url(&format!("http://{addr}"), INSTANCE, JWT)
        .unwrap()
        .with_request_timeout(Duration::from_secs(5));
    (client, shared)
}

fn spec(name: &str, default_index: Option<&str>, allowed: &[&str]) -> SplunkTokenSpec {
    SplunkTokenSpec {
        name: name.to_owned(),
        default_index: default_index.map(str::to_owned),
        allowed_indexes: allowed.iter().map(|i| (*i).to_owned()).collect(),
    }
}

fn accepted() -> Script {
    Script {
        create_status: 202,
        create_body: json!({}),
        read_status: 200,
        read_body: json!({"http-event-collector": {"spec": {"name": "bar"}}}),
        delete_status: 202,
        delete_body: json!({}),
        ..Script::default()
    }
}

#[tokio::test]
async fn test_create_reads_token_back() {
    let (client, script) = serve(accepted()).await;

    let token = client.create_token(&spec("bar", None, &[])).await.unwrap();
    assert_eq!(token.spec.name, "bar");
    assert!(token.value.is_empty());
    assert_eq!(token.spec.default_index, None);
    assert!(token.spec.allowed_indexes.is_empty());

    let script = script.lock().unwrap();
    assert_eq!(script.seen_bodies, vec![json!({"name": "bar"})]);
    let create_headers = &script.seen_headers[0];
    assert_eq!(create_headers["authorization"], "Bearer test-jwt");
    assert_eq!(create_headers["content-type"], "application/json");
    assert_eq!(script.seen_headers[1]["authorization"], "Bearer test-jwt");
}

#[tokio::test]
async fn test_create_appends_default_index() {
    let (client, script) = serve(accepted()).await;

    client
        .create_token(&spec("bar", Some("audit_index"), &["other_index"]))
        .await
        .unwrap();

    let script = script.lock().unwrap();
    assert_eq!(
        script.seen_bodies[0],
        json!({
            "name": "bar",
            "defaultIndex": "audit_index",
            "allowedIndexes": ["other_index", "audit_index"]
        })
    );
}

#[tokio::test]
async fn test_create_returns_token_value() {
    let (client, _) = serve(Script {
        read_body: json!({
            "http-event-collector": {
                "spec": {"name": "bar", "defaultIndex": "main", "allowedIndexes": ["main"]},
                "token": "11111111-2222-3333-4444-555555555555"
            }
        }),
        ..accepted()
    })
    .await;

    let token = client.create_token(&spec("bar", Some("main"), &[])).await.unwrap();
    assert_eq!(token.value, "11111111-2222-3333-4444-555555555555");
    assert_eq!(token.spec.default_index.as_deref(), Some("main"));
    assert_eq!(token.spec.allowed_indexes, vec!["main"]);
}

#[tokio::test]
async fn test_create_error_is_decoded() {
    let (client, script) = serve(Script {
        create_status: 400,
        create_body: json!({"code": "400-x", "message": "boom"}),
        ..accepted()
    })
    .await;

    let err = client.create_token(&spec("bar", None, &[])).await.unwrap_err();
    assert_eq!(err.to_string(), "received error response 400-x: boom");
    assert!(err.is_status(400));
    // no read-back after a failed create
    assert_eq!(script.lock().unwrap().seen_headers.len(), 1);
}

#[tokio::test]
async fn test_create_conflict_reads_existing_token() {
    let (client, _) = serve(Script {
        create_status: 409,
        create_body: json!({"code": "409-conflict", "message": "already exists"}),
        ..accepted()
    })
    .await;

    let token = client.create_token(&spec("bar", None, &[])).await.unwrap();
    assert_eq!(token.spec.name, "bar");
}

#[tokio::test]
async fn test_read_error_is_decoded() {
    let (client, _) = serve(Script {
        read_status: 404,
        read_body: json!({"code": "404-object-not-found", "message": "gone"}),
        ..accepted()
    })
    .await;

    let err = client.read_token("bar").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "received error response 404-object-not-found: gone"
    );
}

#[tokio::test]
async fn test_malformed_read_body() {
    let (client, _) = serve(Script {
        read_body: json!("not a token"),
        ..accepted()
    })
    .await;

    let err = client.read_token("bar").await.unwrap_err();
    assert!(matches!(err, SplunkError::Decode { status: 200, .. }));
}

#[tokio::test]
async fn test_delete_not_found_is_success() {
    let (client, script) = serve(Script {
        delete_status: 404,
        delete_body: json!({"code": "404-object-not-found", "message": "gone"}),
        ..accepted()
    })
    .await;

    client.delete_token("bar").await.unwrap();
    assert_eq!(script.lock().unwrap().seen_deletes, vec!["bar"]);
}

#[tokio::test]
async fn test_delete_accepted_is_success() {
    let (client, _) = serve(accepted()).await;
    client.delete_token("bar").await.unwrap();
}

#[tokio::test]
async fn test_delete_error_is_decoded() {
    let (client, _) = serve(Script {
        delete_status: 500,
        delete_body: json!({"code": "500-internal", "message": "try later"}),
        ..accepted()
    })
    .await;

    let err = client.delete_token("bar").await.unwrap_err();
    assert_eq!(err.to_string(), "received error response 500-internal: try later");
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = SplunkClient::with_base_url(&format!("http://{addr}"), INSTANCE, JWT).unwrap();
    let err = client.read_token("bar").await.unwrap_err();
    assert!(matches!(err, SplunkError::Transport(_)));
}

#[test]
fn test_missing_configuration() {
    assert!(matches!(
        SplunkClient::new("", JWT),
        Err(SplunkError::MissingInstance)
    ));
    assert!(matches!(
        SplunkClient::new(INSTANCE, ""),
        Err(SplunkError::MissingAuthToken)
    ));
}

#[test]
fn test_default_endpoint() {
    let client = SplunkClient::new(INSTANCE, JWT).unwrap();
    assert_eq!(
        client.collection_url(),
        "https://admin.splunk.com/mock_splunk/adminconfig/v2/inputs/http-event-collectors"
    );
    assert!(!format!("{client:?}").contains(JWT));
}
