use crate::fixtures::{TestServer, TEST_GATEWAY_TOKEN, TEST_RESERVED_DID};
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use nono_core::domain::DeviceStatus;
use nono_core::foundation::IdentityError;
use nono_core::infrastructure::gateway::{
    AuthLogFilter, CrossDomainAuthRequest, DeviceFilter, GatewayClient, RegisterDeviceRequest, SyncAuthRecordRequest,
};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

const LOGIN_TOKEN: u64 = 424242;

type Reply = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn check_bearer(headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    let presented = headers.get("authorization").and_then(|value| value.to_str().ok()).unwrap_or_default();
    if presented == format!("Bearer {TEST_GATEWAY_TOKEN}") || presented == format!("Bearer {LOGIN_TOKEN}") {
        return Ok(());
    }
    Err((StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid token" }))))
}

fn device_json(did: &str, domain: &str, status: &str) -> Value {
    json!({
        "id": 1,
        "did": did,
        "device_id": "sensor-001",
        "device_type": "sensor",
        "domain": domain,
        "status": status,
        "metadata": "{}",
        "owner": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        "registered_at": "2024-05-01T10:00:00Z",
        "last_updated": "2024-05-01T10:00:00Z"
    })
}

async fn login(Json(body): Json<Value>) -> Reply {
    if body["password"] != "hunter2" {
        return Err((StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad credentials" }))));
    }
    Ok(Json(json!({ "token": LOGIN_TOKEN, "user": { "username": body["username"] } })))
}

async fn get_device(headers: HeaderMap, Path(did): Path<String>) -> Reply {
    check_bearer(&headers)?;
    Ok(Json(device_json(&did, "domain-a", "active")))
}

async fn revoke_device(headers: HeaderMap, Path(did): Path<String>) -> Reply {
    check_bearer(&headers)?;
    Ok(Json(json!({ "message": format!("device {did} revoked") })))
}

async fn list_devices(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Reply {
    check_bearer(&headers)?;
    let domain = query.get("domain").cloned().unwrap_or_else(|| "any".to_string());
    let status = query.get("status").cloned().unwrap_or_else(|| "active".to_string());
    Ok(Json(json!([device_json("did:test:1", &domain, &status)])))
}

async fn register_device(headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    check_bearer(&headers)?;
    let did = body["did"].as_str().unwrap_or_default().to_string();
    let domain = body["domain"].as_str().unwrap_or_default().to_string();
    Ok(Json(device_json(&did, &domain, "active")))
}

async fn update_status(headers: HeaderMap, Path(did): Path<String>, Json(body): Json<Value>) -> Reply {
    check_bearer(&headers)?;
    let status = body["status"].as_str().unwrap_or_default().to_string();
    Ok(Json(device_json(&did, "domain-a", &status)))
}

async fn cross_domain(headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    check_bearer(&headers)?;
    let authorized = body["target_domain"] != "domain-blocked";
    Ok(Json(json!({ "authorized": authorized, "record_id": 7, "tx_hash": "0xabc" })))
}

async fn auth_records(headers: HeaderMap, Path(did): Path<String>) -> Reply {
    check_bearer(&headers)?;
    Ok(Json(json!([{
        "id": 3, "device_did": did, "source_domain": "domain-a", "target_domain": "domain-b",
        "authorized": true, "tx_hash": "0xabc", "timestamp": "2024-05-01T10:00:00Z"
    }])))
}

async fn auth_logs(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Reply {
    check_bearer(&headers)?;
    let did = query.get("device_did").cloned().unwrap_or_default();
    let domain = query.get("domain").cloned().unwrap_or_default();
    Ok(Json(json!([{
        "id": 9, "device_did": did, "source_domain": domain, "target_domain": "domain-b",
        "action": "success", "message": "authorized", "created_at": "2024-05-01T10:00:00Z"
    }])))
}

async fn verify(headers: HeaderMap, Path(tx_hash): Path<String>) -> Reply {
    check_bearer(&headers)?;
    if tx_hash == "0xmissing" {
        return Err((StatusCode::NOT_FOUND, Json(json!({ "error": "transaction not found" }))));
    }
    Ok(Json(json!({ "tx_hash": tx_hash, "status": true, "block_number": 12, "gas_used": 90000, "confirmations": 3 })))
}

async fn sync(headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    check_bearer(&headers)?;
    Ok(Json(json!({ "synced": true, "echo": body })))
}

fn gateway_router() -> Router {
    Router::new()
        .route("/api/v1/users/login", post(login))
        .route("/api/v1/devices", get(list_devices).post(register_device))
        .route("/api/v1/devices/:did", get(get_device).delete(revoke_device))
        .route("/api/v1/devices/:did/status", put(update_status))
        .route("/api/v1/auth/cross-domain", post(cross_domain))
        .route("/api/v1/auth/records/:did", get(auth_records))
        .route("/api/v1/auth/logs", get(auth_logs))
        .route("/api/v1/auth/verify/:tx_hash", get(verify))
        .route("/api/v1/auth/sync", post(sync))
}

async fn spawn_gateway(token: Option<&str>) -> (TestServer, GatewayClient) {
    let server = TestServer::spawn(gateway_router()).await;
    let client = GatewayClient::with_base_url(&server.base_url("/api/v1"), Duration::from_secs(5)).expect("client");
    if let Some(token) = token {
        client.set_token(SecretString::new(token.to_string()));
    }
    (server, client)
}

#[tokio::test]
async fn test_gateway_when_token_valid_then_device_crud_round_trips() {
    let (_server, client) = spawn_gateway(Some(TEST_GATEWAY_TOKEN)).await;

    let request = RegisterDeviceRequest {
        did: "did:test:1".to_string(),
        device_id: "sensor-001".to_string(),
        domain: "domain-a".to_string(),
        ..RegisterDeviceRequest::default()
    };
    let device = client.register_device(&request).await.expect("register");
    assert_eq!(device.did, "did:test:1");
    assert_eq!(device.domain, "domain-a");

    let updated = client.update_device_status("did:test:1", DeviceStatus::Suspicious).await.expect("update");
    assert_eq!(updated.device_status(), Some(DeviceStatus::Suspicious));

    let message = client.revoke_device("did:test:1").await.expect("revoke");
    assert_eq!(message.message, "device did:test:1 revoked");
}

#[tokio::test]
async fn test_gateway_when_did_has_reserved_chars_then_path_round_trips() {
    let (_server, client) = spawn_gateway(Some(TEST_GATEWAY_TOKEN)).await;

    let device = client.get_device(TEST_RESERVED_DID).await.expect("device");
    assert_eq!(device.did, TEST_RESERVED_DID);

    let records = client.auth_records(TEST_RESERVED_DID).await.expect("records");
    assert_eq!(records[0].device_did, TEST_RESERVED_DID);
}

#[tokio::test]
async fn test_gateway_list_when_filtered_then_query_forwarded() {
    let (_server, client) = spawn_gateway(Some(TEST_GATEWAY_TOKEN)).await;

    let filter = DeviceFilter { domain: Some("domain a&b".to_string()), status: Some(DeviceStatus::Revoked) };
    let devices = client.list_devices(&filter).await.expect("list");
    assert_eq!(devices[0].domain, "domain a&b");
    assert_eq!(devices[0].device_status(), Some(DeviceStatus::Revoked));

    let logs = client
        .auth_logs(&AuthLogFilter { device_did: Some("did:test:1".to_string()), domain: Some("domain-a".to_string()) })
        .await
        .expect("logs");
    assert_eq!(logs[0].device_did, "did:test:1");
    assert_eq!(logs[0].source_domain, "domain-a");
}

#[tokio::test]
async fn test_gateway_auth_when_requested_then_decision_and_sync_returned() {
    let (_server, client) = spawn_gateway(Some(TEST_GATEWAY_TOKEN)).await;

    let request = CrossDomainAuthRequest {
        device_did: "did:test:1".to_string(),
        source_domain: "domain-a".to_string(),
        target_domain: "domain-blocked".to_string(),
    };
    let response = client.request_cross_domain_auth(&request).await.expect("auth");
    assert!(!response.authorized);
    assert_eq!(response.record_id, 7);

    let verification = client.verify_transaction("0xabc").await.expect("verify");
    assert!(verification.status);
    assert_eq!(verification.confirmations, 3);

    let synced = client
        .sync_auth_record(&SyncAuthRecordRequest {
            device_did: "did:test:1".to_string(),
            source_domain: "domain-a".to_string(),
            target_domain: "domain-b".to_string(),
            authorized: true,
            tx_hash: "0xabc".to_string(),
        })
        .await
        .expect("sync");
    assert_eq!(synced["echo"]["device_did"], "did:test:1");
}

#[tokio::test]
async fn test_gateway_when_token_rejected_then_unauthorized_and_token_cleared() {
    let (_server, client) = spawn_gateway(Some("stale-token")).await;
    assert!(client.has_token());

    let err = client.get_device("did:test:1").await.expect_err("401");
    assert!(matches!(err, IdentityError::Unauthorized { .. }));
    assert_eq!(err.http_status(), Some(401));
    assert!(!client.has_token());
}

#[tokio::test]
async fn test_gateway_login_when_numeric_token_then_used_as_bearer() {
    let (_server, client) = spawn_gateway(None).await;
    assert!(matches!(client.get_device("did:test:1").await, Err(IdentityError::Unauthorized { .. })));

    let user = client.login("operator", &SecretString::new("hunter2".to_string())).await.expect("login");
    assert_eq!(user["username"], "operator");
    assert!(client.has_token());
    assert_eq!(client.get_device("did:test:1").await.expect("device").did, "did:test:1");
}

#[tokio::test]
async fn test_gateway_when_non_success_status_then_request_failed_with_error_text() {
    let (_server, client) = spawn_gateway(Some(TEST_GATEWAY_TOKEN)).await;

    match client.verify_transaction("0xmissing").await.expect_err("404") {
        IdentityError::GatewayRequestFailed { status, message, url } => {
            assert_eq!(status, 404);
            assert_eq!(message, "transaction not found");
            assert!(url.ends_with("/auth/verify/0xmissing"));
        }
        other => panic!("unexpected error {other}"),
    }
    assert!(client.has_token());
    assert!(matches!(client.verify_transaction("  ").await, Err(IdentityError::InvalidInput(_))));
}
