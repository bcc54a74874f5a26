//! Integration tests for the HTTP pool store.
//!
//! Runs a fake pool-hosting service on an ephemeral port and checks retry
//! behaviour, status mapping and the request body shape.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use pool_bot::pool::CardEntry;
use pool_bot::store::{HttpPoolStore, PoolStore, PoolStoreConfig, RemotePoolId, StoreError};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Request counters and captured bodies of the fake service
#[derive(Default)]
struct FakeService {
    hits: Mutex<HashMap<String, u32>>,
    bodies: Mutex<Vec<Value>>,
}

impl FakeService {
    fn hit(&self, key: &str) -> u32 {
        let mut hits = self.hits.lock().unwrap();
        let count = hits.entry(key.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    fn hits(&self, key: &str) -> u32 {
        self.hits.lock().unwrap().get(key).copied().unwrap_or(0)
    }
}

async fn get_pool(State(fake): State<Arc<FakeService>>, Path(id): Path<String>) -> Response {
    let hit = fake.hit(&id);
    match id.as_str() {
        "missing" => StatusCode::NOT_FOUND.into_response(),
        "down" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "flaky" if hit < 3 => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => Json(json!({
            "poolId": id,
            "sideboard": [{ "name": "Opt", "count": 1, "set": "XLN" }],
            "deck": [{ "name": "Shock", "count": 2 }],
            "hidden": [{ "name": "Island", "count": 1 }],
        }))
        .into_response(),
    }
}

async fn create_pool(State(fake): State<Arc<FakeService>>, Json(body): Json<Value>) -> Response {
    let mode = body["sideboard"][0]["name"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    let hit = fake.hit(&mode);
    fake.bodies.lock().unwrap().push(body);

    match mode.as_str() {
        "reject" => (StatusCode::BAD_REQUEST, "bad sideboard").into_response(),
        "empty" => Json(json!({ "poolId": "" })).into_response(),
        "garbled" => (StatusCode::OK, "not json").into_response(),
        "flaky" if hit < 2 => StatusCode::BAD_GATEWAY.into_response(),
        "down" => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => Json(json!({ "poolId": format!("new{hit}") })).into_response(),
    }
}

/// Helper to start the fake service and a store pointed at it
async fn setup() -> (HttpPoolStore, Arc<FakeService>) {
    let fake = Arc::new(FakeService::default());
    let app = Router::new()
        .route("/api/pools", post(create_pool))
        .route("/api/pools/{id}", get(get_pool))
        .with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let store = HttpPoolStore::new(PoolStoreConfig {
        base_url: format!("http://{addr}/api/pools"),
        max_attempts: 3,
        request_timeout_secs: 5,
        link_base: "https://sealeddeck.tech".to_string(),
    })
    .unwrap();

    (store, fake)
}

// ============================================================================
// fetch_pool
// ============================================================================

#[tokio::test]
async fn test_fetch_unions_all_partitions() {
    let (store, fake) = setup().await;

    let cards = store.fetch_pool(&RemotePoolId::new("good")).await.unwrap();
    assert_eq!(
        cards,
        vec![
            CardEntry::new("Opt", 1),
            CardEntry::new("Shock", 2),
            CardEntry::new("Island", 1),
        ]
    );
    assert_eq!(fake.hits("good"), 1);
}

#[tokio::test]
async fn test_fetch_not_found_is_not_retried() {
    let (store, fake) = setup().await;

    let err = store
        .fetch_pool(&RemotePoolId::new("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref id) if id.as_str() == "missing"));
    assert_eq!(fake.hits("missing"), 1);
}

#[tokio::test]
async fn test_fetch_recovers_on_third_attempt() {
    let (store, fake) = setup().await;

    let cards = store.fetch_pool(&RemotePoolId::new("flaky")).await.unwrap();
    assert_eq!(cards.len(), 3);
    assert_eq!(fake.hits("flaky"), 3);
}

#[tokio::test]
async fn test_fetch_gives_up_after_three_attempts() {
    let (store, fake) = setup().await;

    let err = store
        .fetch_pool(&RemotePoolId::new("down"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Unavailable { attempts: 3, .. }));
    assert_eq!(fake.hits("down"), 3);
}

// ============================================================================
// create_or_extend_pool
// ============================================================================

#[tokio::test]
async fn test_create_sends_sideboard_without_pool_id() {
    let (store, fake) = setup().await;

    let id = store
        .create_or_extend_pool(&[CardEntry::new("Opt", 2)], None)
        .await
        .unwrap();
    assert_eq!(id.as_str(), "new1");

    let bodies = fake.bodies.lock().unwrap();
    assert_eq!(
        bodies[0],
        json!({ "sideboard": [{ "name": "Opt", "count": 2 }] })
    );
}

#[tokio::test]
async fn test_extend_sends_base_pool_id() {
    let (store, fake) = setup().await;

    store
        .create_or_extend_pool(
            &[CardEntry::new("Shock", 1)],
            Some(&RemotePoolId::new("start1")),
        )
        .await
        .unwrap();

    let bodies = fake.bodies.lock().unwrap();
    assert_eq!(bodies[0]["poolId"], json!("start1"));
}

#[tokio::test]
async fn test_rejection_is_not_retried() {
    let (store, fake) = setup().await;

    let err = store
        .create_or_extend_pool(&[CardEntry::new("reject", 1)], None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Rejected { status: 400, ref body } if body == "bad sideboard"));
    assert_eq!(fake.hits("reject"), 1);
}

#[tokio::test]
async fn test_unusable_pool_id_fails_without_retry() {
    let (store, fake) = setup().await;

    for mode in ["empty", "garbled"] {
        let err = store
            .create_or_extend_pool(&[CardEntry::new(mode, 1)], None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { attempts: 1, .. }));
        assert_eq!(fake.hits(mode), 1);
    }
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let (store, fake) = setup().await;

    let id = store
        .create_or_extend_pool(&[CardEntry::new("flaky", 1)], None)
        .await
        .unwrap();
    assert_eq!(id.as_str(), "new2");
    assert_eq!(fake.hits("flaky"), 2);

    let err = store
        .create_or_extend_pool(&[CardEntry::new("down", 1)], None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Unavailable { attempts: 3, .. }));
    assert_eq!(fake.hits("down"), 3);
}

#[tokio::test]
async fn test_unreachable_service_is_unavailable() {
    let store = HttpPoolStore::new(PoolStoreConfig {
        base_url: "http://127.0.0.1:1/api/pools".to_string(),
        max_attempts: 2,
        request_timeout_secs: 2,
        link_base: "https://sealeddeck.tech".to_string(),
    })
    .unwrap();

    let err = store
        .fetch_pool(&RemotePoolId::new("any"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Unavailable { attempts: 2, .. }));
}
