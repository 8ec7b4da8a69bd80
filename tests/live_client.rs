//! Live REST client against a local canned server

mod common;

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use telecom_ims::api::{ApiClient, ApiConfig, QueryParams, STATUS_INTERNAL, STATUS_TIMEOUT};
use telecom_ims::storage::{KeyValueStore, MemoryStore, AUTH_TOKEN_KEY};

fn client(base_url: String, store: Arc<MemoryStore>) -> ApiClient {
    let config = ApiConfig {
        base_url,
        timeout: Duration::from_millis(500),
        ..Default::default()
    };
    ApiClient::new(config, store).unwrap()
}

#[tokio::test]
async fn test_get_encodes_query_string() {
    let (url, mut requests) = common::serve(200, r#"{"success":true,"data":[]}"#).await;
    let api = client(url, Arc::new(MemoryStore::new()));

    let mut params = QueryParams::new();
    params.insert("status".into(), "depot".into());
    params.insert("brand".into(), "ZTE".into());
    let response = api.get::<Vec<Value>>("/modems", Some(&params)).await;
    assert!(response.is_success());
    assert_eq!(response.data, Some(vec![]));

    let seen = requests.recv().await.unwrap();
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.target, "/api/modems?brand=ZTE&status=depot");
    assert_eq!(seen.header("content-type"), Some("application/json"));
    assert!(seen.body.is_empty());
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let (url, mut requests) =
        common::serve(200, r#"{"success":true,"data":{"id":"modem-9"},"message":"Created"}"#)
            .await;
    let api = client(url, Arc::new(MemoryStore::new()));

    let payload = json!({"imei": "352094087659999", "brand": "Nokia"});
    let response = api.post::<Value, Value>("/modems", Some(&payload)).await;
    assert_eq!(response.message.as_deref(), Some("Created"));

    let seen = requests.recv().await.unwrap();
    assert_eq!(seen.method, "POST");
    let sent: Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(sent, payload);
}

#[tokio::test]
async fn test_delete_sends_no_body() {
    let (url, mut requests) = common::serve(200, r#"{"success":true,"data":null}"#).await;
    let api = client(url, Arc::new(MemoryStore::new()));

    api.delete::<Value>("/modems/modem-1").await;
    let seen = requests.recv().await.unwrap();
    assert_eq!(seen.method, "DELETE");
    assert_eq!(seen.target, "/api/modems/modem-1");
    assert!(seen.body.is_empty());
}

#[tokio::test]
async fn test_timeout_envelope() {
    let url = common::silent().await;
    let api = ApiClient::new(
        ApiConfig {
            base_url: url,
            timeout: Duration::from_millis(100),
            ..Default::default()
        },
        Arc::new(MemoryStore::new()),
    )
    .unwrap();

    let started = Instant::now();
    let response = api.get::<Value>("/modems", None).await;
    assert!(started.elapsed() < Duration::from_secs(5));

    assert!(!response.success);
    assert_eq!(response.status_code, Some(STATUS_TIMEOUT));
    assert_eq!(response.error.as_deref(), Some("Request timeout"));
}

#[tokio::test]
async fn test_non_2xx_becomes_500() {
    let (url, _requests) = common::serve(503, r#"{"success":false}"#).await;
    let api = client(url, Arc::new(MemoryStore::new()));

    let response = api.get::<Value>("/dashboard/stats", None).await;
    assert_eq!(response.status_code, Some(STATUS_INTERNAL));
    assert_eq!(response.error.as_deref(), Some("HTTP error! status: 503"));
}

#[tokio::test]
async fn test_payload_shape_mismatch_becomes_500() {
    let (url, _requests) = common::serve(200, r#"{"success":true,"data":{"x":1}}"#).await;
    let api = client(url, Arc::new(MemoryStore::new()));

    let response = api.get::<Vec<u32>>("/modems", None).await;
    assert!(!response.success);
    assert_eq!(response.status_code, Some(STATUS_INTERNAL));
}

#[tokio::test]
async fn test_bearer_token_lifecycle() {
    let (url, mut requests) = common::serve(200, r#"{"success":true,"data":{}}"#).await;
    let store = Arc::new(MemoryStore::new());
    let api = client(url.clone(), store.clone());

    api.set_auth_token("tok-123").unwrap();
    api.get::<Value>("/auth/profile", None).await;
    let seen = requests.recv().await.unwrap();
    assert_eq!(seen.header("authorization"), Some("Bearer tok-123"));
    assert_eq!(store.get(AUTH_TOKEN_KEY).as_deref(), Some("tok-123"));

    // a fresh client restores the persisted token
    let restored = client(url, store.clone());
    assert!(restored.is_authenticated());
    restored.get::<Value>("/auth/profile", None).await;
    let seen = requests.recv().await.unwrap();
    assert_eq!(seen.header("authorization"), Some("Bearer tok-123"));

    restored.clear_auth_token().unwrap();
    restored.get::<Value>("/auth/profile", None).await;
    let seen = requests.recv().await.unwrap();
    assert_eq!(seen.header("authorization"), None);
    assert!(store.get(AUTH_TOKEN_KEY).is_none());
}
