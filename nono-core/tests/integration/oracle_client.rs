use crate::fixtures::{closed_port, TestServer, TEST_RESERVED_DID};
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use nono_core::domain::DeviceStatus;
use nono_core::foundation::IdentityError;
use nono_core::infrastructure::oracle::OracleClient;
use serde_json::{json, Value};
use std::time::Duration;

fn device_status_json(did: &str, status: &str, source: &str) -> Value {
    json!({
        "did": did,
        "status": status,
        "online": status == "active",
        "last_seen": "2024-05-01T10:00:00Z",
        "metadata": "{}",
        "source": source,
        "timestamp": "2024-05-01T10:00:05Z"
    })
}

fn oracle_router() -> Router {
    Router::new()
        .route("/api/v1/health", get(|| async { Json(json!({ "status": "healthy", "data_sources": 3, "blockchain": true })) }))
        .route(
            "/api/v1/status",
            get(|| async {
                Json(json!({
                    "status": "running",
                    "data_sources": 2,
                    "data_sources_detail": [{ "name": "monitoring", "healthy": true }, { "name": "api", "healthy": false }],
                    "blockchain": true,
                    "interval": 30,
                    "min_consensus": 2,
                    "voting_nodes": 3
                }))
            }),
        )
        .route("/api/v1/datasources", get(|| async { Json(json!([{ "name": "monitoring", "healthy": true }])) }))
        .route(
            "/api/v1/device/:did/status",
            get(|Path(did): Path<String>| async move { Json(device_status_json(&did, "active", "monitoring")) }),
        )
        .route(
            "/api/v1/devices/status",
            get(|| async {
                Json(json!({
                    "did:test:1": device_status_json("did:test:1", "active", "monitoring"),
                    "did:test:2": device_status_json("did:test:2", "revoked", "certificate")
                }))
            }),
        )
        .route(
            "/api/v1/consensus/:did",
            get(|Path(did): Path<String>| async move {
                Json(json!({
                    "device_did": did,
                    "total_votes": 3,
                    "vote_details": { "suspicious": 2, "active": 1 },
                    "consensus": true,
                    "consensus_status": device_status_json(&did, "suspicious", "api"),
                    "min_consensus": 2,
                    "all_statuses": [
                        device_status_json(&did, "suspicious", "api"),
                        device_status_json(&did, "suspicious", "certificate"),
                        device_status_json(&did, "active", "monitoring")
                    ]
                }))
            }),
        )
        .route(
            "/api/v1/config",
            get(|| async {
                Json(json!({
                    "oracle": { "interval": 30, "voting_nodes": 3, "min_consensus": 2 },
                    "blockchain": {
                        "rpc_url": "http://127.0.0.1:8545", "chain_id": 31337,
                        "contract_addr": "0x5FbDB2315678afecb367f032d93F642f64180aa3",
                        "configured": true, "private_key_configured": true
                    },
                    "data_sources": {
                        "configured": [{ "name": "monitoring", "type": "http", "url": "http://mon", "enabled": true, "api_key_configured": false }],
                        "loaded": 1
                    }
                }))
            }),
        )
}

async fn spawn_oracle() -> (TestServer, OracleClient) {
    let server = TestServer::spawn(oracle_router()).await;
    let client = OracleClient::with_base_url(&server.base_url("/api/v1"), Duration::from_secs(5)).expect("client");
    (server, client)
}

#[tokio::test]
async fn test_oracle_health_and_status_when_served_then_decoded() {
    let (_server, client) = spawn_oracle().await;

    let health = client.health().await.expect("health");
    assert!(health.is_healthy());
    assert_eq!(health.data_sources, 3);

    let status = client.status().await.expect("status");
    assert_eq!(status.voting_nodes, 3);
    assert_eq!(status.data_sources_detail.len(), 2);
    assert!(!status.data_sources_detail[1].healthy);

    let sources = client.data_sources().await.expect("datasources");
    assert_eq!(sources[0].name, "monitoring");
}

#[tokio::test]
async fn test_oracle_device_status_when_did_has_reserved_chars_then_path_round_trips() {
    let (_server, client) = spawn_oracle().await;

    let status = client.device_status(TEST_RESERVED_DID).await.expect("device status");
    assert_eq!(status.did, TEST_RESERVED_DID);
    assert_eq!(status.device_status(), Some(DeviceStatus::Active));

    let consensus = client.consensus_status(TEST_RESERVED_DID).await.expect("consensus");
    assert_eq!(consensus.did, TEST_RESERVED_DID);
}

#[tokio::test]
async fn test_oracle_consensus_when_majority_suspicious_then_accessors_agree() {
    let (_server, client) = spawn_oracle().await;

    let consensus = client.consensus_status("did:test:1").await.expect("consensus");
    assert!(consensus.consensus_reached);
    assert_eq!(consensus.status(), Some(DeviceStatus::Suspicious));
    assert!((consensus.trust_value() - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(consensus.data_source_ids(), vec!["api", "certificate", "monitoring"]);
}

#[tokio::test]
async fn test_oracle_collections_and_config_when_served_then_decoded() {
    let (_server, client) = spawn_oracle().await;

    let all = client.all_device_statuses().await.expect("devices");
    assert_eq!(all.len(), 2);
    assert_eq!(all["did:test:2"].device_status(), Some(DeviceStatus::Revoked));

    let config = client.config().await.expect("config");
    assert_eq!(config.oracle.min_consensus, 2);
    assert_eq!(config.blockchain.chain_id, 31337);
    assert_eq!(config.data_sources.configured[0].kind, "http");
}

#[tokio::test]
async fn test_oracle_when_path_missing_then_404_message_names_url() {
    let server = TestServer::spawn(Router::new()).await;
    let client = OracleClient::with_base_url(&server.base_url("/oracle"), Duration::from_secs(5)).expect("client");

    let err = client.health().await.expect_err("404");
    let expected_url = format!("{}/health", server.base_url("/oracle"));
    match &err {
        IdentityError::OracleRequestFailed { status, url, message } => {
            assert_eq!(*status, 404);
            assert_eq!(url, &expected_url);
            assert!(message.contains("not found (404)"));
            assert!(message.contains(&expected_url));
        }
        other => panic!("unexpected error {other}"),
    }
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_oracle_when_server_error_then_error_text_surfaced() {
    let router = Router::new().route(
        "/api/v1/health",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "data source timeout" }))) }),
    );
    let server = TestServer::spawn(router).await;
    let client = OracleClient::with_base_url(&server.base_url("/api/v1"), Duration::from_secs(5)).expect("client");

    let err = client.health().await.expect_err("500");
    assert!(err.is_retryable());
    match err {
        IdentityError::OracleRequestFailed { status, message, .. } => {
            assert_eq!(status, 500);
            assert!(message.contains("data source timeout"));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[tokio::test]
async fn test_oracle_when_nothing_listening_then_unreachable_with_port() {
    let port = closed_port().await;
    let client = OracleClient::with_base_url(&format!("http://127.0.0.1:{port}/api/v1"), Duration::from_secs(5)).expect("client");

    let err = client.health().await.expect_err("unreachable");
    match &err {
        IdentityError::OracleUnreachable { port: reported, .. } => assert_eq!(*reported, port),
        other => panic!("unexpected error {other}"),
    }
    assert!(err.to_string().contains(&format!("port {port}")));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_oracle_when_body_not_json_then_serialization_error() {
    let server = TestServer::spawn(Router::new().route("/api/v1/health", get(|| async { "ok" }))).await;
    let client = OracleClient::with_base_url(&server.base_url("/api/v1"), Duration::from_secs(5)).expect("client");
    assert!(matches!(client.health().await, Err(IdentityError::SerializationError { .. })));
}

#[tokio::test]
async fn test_oracle_client_when_base_url_relative_then_config_error() {
    assert!(matches!(OracleClient::with_base_url("/oracle-api", Duration::from_secs(1)), Err(IdentityError::ConfigError(_))));
}
