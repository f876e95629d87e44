//! End-to-end listing tests against an in-process HTTP server.
//!
//! Verifies that:
//! - cursor pagination is followed over real HTTP until an empty page
//! - download URLs use the configured download base
//! - the bearer token is sent and a rejected token reads as "not found"
//! - 5xx responses are retried, and surface as network errors once retries run out
//! - the listing is requested recursively, so nested files reach the plan
//! - a listing page slower than the timeout is a network error

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use modelfetch_core::{Branch, FetchError, ListingResolverPort, RepoRef};
use modelfetch_hf::{DefaultHfClient, HfClientConfig, encode_cursor};
use serde_json::{Value, json};

struct ListingState {
    /// Pages keyed by cursor; `None` is the first page.
    pages: HashMap<Option<String>, Value>,
    token: Option<String>,
    /// Number of leading requests answered with 500.
    failures: usize,
    hits: AtomicUsize,
    /// Added before every answer.
    delay: Duration,
}

async fn tree(
    State(state): State<Arc<ListingState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let hit = state.hits.fetch_add(1, Ordering::SeqCst);
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    if hit < state.failures {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    if let Some(ref token) = state.token {
        let expected = format!("Bearer {token}");
        let sent = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok());
        if sent != Some(expected.as_str()) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    // Like the Hub, only a recursive listing includes files below the top level.
    let recursive = query.get("recursive").is_some_and(|v| v == "true");
    match state.pages.get(&query.get("cursor").cloned()) {
        Some(Value::Array(entries)) => {
            let visible: Vec<Value> = entries
                .iter()
                .filter(|entry| {
                    recursive
                        || !entry["path"].as_str().is_some_and(|path| path.contains('/'))
                })
                .cloned()
                .collect();
            axum::Json(Value::Array(visible)).into_response()
        }
        Some(page) => axum::Json(page.clone()).into_response(),
        None => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn start_server(state: ListingState) -> (SocketAddr, Arc<ListingState>) {
    let state = Arc::new(state);
    let app = Router::new()
        .route("/api/models/:owner/:name/tree/:branch", get(tree))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    (addr, state)
}

fn two_page_listing() -> HashMap<Option<String>, Value> {
    HashMap::from([
        (
            None,
            json!([
                {"type": "file", "path": "config.json", "size": 600},
                {"type": "file", "path": "model.safetensors", "size": 135,
                 "lfs": {"oid": "abc", "size": 5000, "pointerSize": 135}}
            ]),
        ),
        (
            Some(encode_cursor("model.safetensors")),
            json!([
                {"type": "file", "path": "pytorch_model.bin", "size": 5000},
                {"type": "file", "path": "tokenizer.model", "size": 40}
            ]),
        ),
        (Some(encode_cursor("tokenizer.model")), json!([])),
    ])
}

fn client_for(addr: SocketAddr, config: HfClientConfig) -> DefaultHfClient {
    let config = config
        .with_api_base(format!("http://{addr}/api/models"))
        .with_download_base(format!("http://{addr}"))
        .with_retry_delay(Duration::from_millis(1));
    DefaultHfClient::new(&config).expect("Failed to build client")
}

fn repo() -> RepoRef {
    RepoRef::parse("org/model").unwrap()
}

#[tokio::test]
async fn test_paginated_listing_over_http() {
    // Arrange
    let (addr, state) = start_server(ListingState {
        pages: two_page_listing(),
        token: None,
        failures: 0,
        hits: AtomicUsize::new(0),
        delay: Duration::ZERO,
    })
    .await;
    let client = client_for(addr, HfClientConfig::new());

    // Act
    let plan = client.resolve(&repo(), &Branch::main(), false).await.unwrap();

    // Assert
    let paths: Vec<_> = plan.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, ["config.json", "model.safetensors", "tokenizer.model"]);
    assert_eq!(
        plan.files[1].url,
        format!("http://{addr}/org/model/resolve/main/model.safetensors")
    );
    assert_eq!(plan.hashes.len(), 1);
    assert_eq!(plan.total_size(), 5640);
    assert_eq!(state.hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let (addr, _state) = start_server(ListingState {
        pages: two_page_listing(),
        token: Some("hf_secret".to_string()),
        failures: 0,
        hits: AtomicUsize::new(0),
        delay: Duration::ZERO,
    })
    .await;

    let authorized = client_for(addr, HfClientConfig::new().with_token("hf_secret"));
    assert!(authorized.resolve(&repo(), &Branch::main(), true).await.is_ok());

    let anonymous = client_for(addr, HfClientConfig::new());
    let err = anonymous
        .resolve(&repo(), &Branch::main(), true)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::NotFound { .. }));
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let (addr, state) = start_server(ListingState {
        pages: two_page_listing(),
        token: None,
        failures: 2,
        hits: AtomicUsize::new(0),
        delay: Duration::ZERO,
    })
    .await;
    let client = client_for(addr, HfClientConfig::new().with_max_retries(2));

    let plan = client.resolve(&repo(), &Branch::main(), false).await.unwrap();

    assert_eq!(plan.files.len(), 3);
    assert_eq!(state.hits.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_server_error_without_retries_is_network_error() {
    let (addr, _state) = start_server(ListingState {
        pages: two_page_listing(),
        token: None,
        failures: 1,
        hits: AtomicUsize::new(0),
        delay: Duration::ZERO,
    })
    .await;
    let client = client_for(addr, HfClientConfig::new().with_max_retries(0));

    let err = client
        .resolve(&repo(), &Branch::main(), false)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FetchError::Network {
            status_code: Some(500),
            ..
        }
    ));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Bind and drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(addr, HfClientConfig::new().with_max_retries(0));
    let err = client
        .resolve(&repo(), &Branch::main(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Network { .. }));
}

#[tokio::test]
async fn test_directory_contents_reach_the_plan() {
    // Arrange
    let (addr, _state) = start_server(ListingState {
        pages: HashMap::from([
            (
                None,
                json!([
                    {"type": "file", "path": "config.json", "size": 600},
                    {"type": "directory", "path": "text_encoder", "size": 0},
                    {"type": "file", "path": "text_encoder/model.safetensors", "size": 135,
                     "lfs": {"oid": "def", "size": 900, "pointerSize": 135}}
                ]),
            ),
            (Some(encode_cursor("text_encoder/model.safetensors")), json!([])),
        ]),
        token: None,
        failures: 0,
        hits: AtomicUsize::new(0),
        delay: Duration::ZERO,
    })
    .await;
    let client = client_for(addr, HfClientConfig::new());

    // Act
    let plan = client.resolve(&repo(), &Branch::main(), false).await.unwrap();

    // Assert
    let paths: Vec<_> = plan.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, ["config.json", "text_encoder/model.safetensors"]);
    assert_eq!(
        plan.files[1].url,
        format!("http://{addr}/org/model/resolve/main/text_encoder/model.safetensors")
    );
}

#[tokio::test]
async fn test_slow_listing_times_out_as_network_error() {
    // Arrange
    let (addr, _state) = start_server(ListingState {
        pages: two_page_listing(),
        token: None,
        failures: 0,
        hits: AtomicUsize::new(0),
        delay: Duration::from_secs(5),
    })
    .await;
    let client = client_for(
        addr,
        HfClientConfig::new()
            .with_timeout(Duration::from_millis(300))
            .with_max_retries(0),
    );

    // Act
    let started = std::time::Instant::now();
    let err = client
        .resolve(&repo(), &Branch::main(), false)
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(err, FetchError::Network { .. }), "got {err:?}");
    assert!(started.elapsed() < Duration::from_secs(3));
}
