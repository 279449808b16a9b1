use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::put;
use axum::Router;
use bytes::Bytes;
use vitrine_storage::{default_client, HttpObjectStore, ObjectStoreError};

#[derive(Clone, Default)]
struct BucketState {
    put_attempts: Arc<Mutex<HashMap<String, usize>>>,
    stored: Arc<Mutex<Vec<String>>>,
    fail_first_put: bool,
    reject_all: bool,
}

async fn handle_put(
    State(state): State<BucketState>,
    Path(key): Path<String>,
    _body: Bytes,
) -> StatusCode {
    if state.reject_all {
        return StatusCode::FORBIDDEN;
    }
    let mut attempts = state.put_attempts.lock().unwrap();
    let n = attempts.entry(key.clone()).or_insert(0);
    *n += 1;
    if state.fail_first_put && *n == 1 {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    state.stored.lock().unwrap().push(key);
    StatusCode::OK
}

async fn handle_delete(State(state): State<BucketState>, Path(key): Path<String>) -> StatusCode {
    let mut stored = state.stored.lock().unwrap();
    match stored.iter().position(|k| *k == key) {
        Some(ix) => {
            stored.remove(ix);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn start_bucket(state: BucketState) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let app = Router::new()
        .route("/*key", put(handle_put).delete(handle_delete))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, handle)
}

fn store_for(addr: SocketAddr) -> HttpObjectStore {
    HttpObjectStore::new(default_client().unwrap(), "acme-media", "ap-southeast-1")
        .with_endpoint(format!("http://{addr}"))
}

#[tokio::test]
async fn put_stores_the_object_under_its_key() {
    let state = BucketState::default();
    let (addr, _server) = start_bucket(state.clone()).await;
    let store = store_for(addr);

    store
        .put("products/p1/1-0.jpg", Bytes::from_static(b"jpeg"), "image/jpeg")
        .await
        .unwrap();

    assert_eq!(
        state.stored.lock().unwrap().as_slice(),
        ["products/p1/1-0.jpg"]
    );
}

#[tokio::test]
async fn transient_server_errors_are_retried() {
    let state = BucketState {
        fail_first_put: true,
        ..Default::default()
    };
    let (addr, _server) = start_bucket(state.clone()).await;
    let store = store_for(addr);

    store
        .put("products/p1/1-0.jpg", Bytes::from_static(b"jpeg"), "image/jpeg")
        .await
        .unwrap();

    let attempts = state.put_attempts.lock().unwrap();
    assert_eq!(attempts.get("products/p1/1-0.jpg"), Some(&2));
}

#[tokio::test]
async fn client_errors_fail_fast_without_retry() {
    let state = BucketState {
        reject_all: true,
        ..Default::default()
    };
    let (addr, _server) = start_bucket(state.clone()).await;
    let store = store_for(addr);

    let err = store
        .put("products/p1/1-0.jpg", Bytes::from_static(b"jpeg"), "image/jpeg")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ObjectStoreError::Rejected { status, .. } if status == StatusCode::FORBIDDEN
    ));
}

#[tokio::test]
async fn deleting_a_missing_object_is_idempotent() {
    let state = BucketState::default();
    let (addr, _server) = start_bucket(state.clone()).await;
    let store = store_for(addr);

    store.delete("products/ghost/1-0.jpg").await.unwrap();
}

#[tokio::test]
async fn public_url_uses_the_derived_bucket_host_without_endpoint_override() {
    use vitrine_catalog::ObjectStore;

    let store = HttpObjectStore::new(default_client().unwrap(), "acme-media", "ap-southeast-1");
    assert_eq!(
        store.public_url("products/p1/1-0.jpg"),
        "https://acme-media.s3.ap-southeast-1.amazonaws.com/products/p1/1-0.jpg"
    );
}
