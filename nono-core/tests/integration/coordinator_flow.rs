use crate::fixtures::{closed_port, fast_submit_options, LedgerHarness, TestServer, TEST_DID, TEST_SOURCE_DOMAIN, TEST_TARGET_DOMAIN};
use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use nono_core::application::AuthorizationCoordinator;
use nono_core::domain::{Conflict, DeviceStatus, Verdict};
use nono_core::infrastructure::oracle::OracleClient;
use serde_json::json;
use std::time::Duration;

/// Oracle whose consensus reports `status` for every DID.
async fn oracle_reporting(status: &'static str, consensus: bool) -> (TestServer, OracleClient) {
    let router = Router::new().route(
        "/api/v1/consensus/:did",
        get(move |Path(did): Path<String>| async move {
            let winner = if consensus {
                json!({ "did": did, "status": status, "online": true, "source": "monitoring" })
            } else {
                serde_json::Value::Null
            };
            Json(json!({
                "device_did": did,
                "total_votes": 3,
                "vote_details": { (status): 3 },
                "consensus": consensus,
                "consensus_status": winner,
                "min_consensus": 2,
                "all_statuses": []
            }))
        }),
    );
    let server = TestServer::spawn(router).await;
    let client = OracleClient::with_base_url(&server.base_url("/api/v1"), Duration::from_secs(5)).expect("oracle");
    (server, client)
}

async fn registered_coordinator(oracle: Option<OracleClient>) -> (LedgerHarness, AuthorizationCoordinator) {
    let harness = LedgerHarness::connected().await;
    let coordinator = AuthorizationCoordinator::new(harness.session.clone(), fast_submit_options(), oracle);
    coordinator.register_device(TEST_DID, "{}").await.expect("register");
    (harness, coordinator)
}

#[tokio::test]
async fn test_cross_reference_when_oracle_agrees_then_consistent() {
    let (_server, oracle) = oracle_reporting("active", true).await;
    let (_harness, coordinator) = registered_coordinator(Some(oracle)).await;

    let result = coordinator.request_cross_domain_auth(TEST_DID, TEST_SOURCE_DOMAIN, TEST_TARGET_DOMAIN).await.expect("auth");
    assert!(result.is_authorized());

    let check = coordinator.cross_reference(TEST_DID, &result).await;
    assert_eq!(check.verdict, Verdict::Consistent);
    assert_eq!(check.ledger_status, Some(DeviceStatus::Active));
    assert_eq!(check.oracle_status, Some(DeviceStatus::Active));
}

#[tokio::test]
async fn test_cross_reference_when_oracle_flags_device_then_conflicting() {
    let (_server, oracle) = oracle_reporting("suspicious", true).await;
    let (_harness, coordinator) = registered_coordinator(Some(oracle)).await;

    let result = coordinator.request_cross_domain_auth(TEST_DID, TEST_SOURCE_DOMAIN, TEST_TARGET_DOMAIN).await.expect("auth");
    let check = coordinator.cross_reference(TEST_DID, &result).await;
    assert_eq!(
        check.verdict,
        Verdict::Conflicting(vec![
            Conflict::AuthorizedButFlagged { oracle_status: DeviceStatus::Suspicious },
            Conflict::StatusDrift { ledger_status: DeviceStatus::Active, oracle_status: DeviceStatus::Suspicious },
        ])
    );
    // The ledger outcome itself is untouched by the cross-check.
    assert!(result.is_authorized());
}

#[tokio::test]
async fn test_cross_reference_when_consensus_not_reached_then_indeterminate() {
    let (_server, oracle) = oracle_reporting("active", false).await;
    let (_harness, coordinator) = registered_coordinator(Some(oracle)).await;

    let result = coordinator.request_cross_domain_auth(TEST_DID, TEST_SOURCE_DOMAIN, TEST_TARGET_DOMAIN).await.expect("auth");
    let check = coordinator.cross_reference(TEST_DID, &result).await;
    assert!(matches!(check.verdict, Verdict::Indeterminate(_)));
    assert!(!check.oracle_consensus_reached);
}

#[tokio::test]
async fn test_cross_reference_when_oracle_down_then_indeterminate_and_ledger_result_kept() {
    let port = closed_port().await;
    let oracle = OracleClient::with_base_url(&format!("http://127.0.0.1:{port}/api/v1"), Duration::from_secs(2)).expect("oracle");
    let (_harness, coordinator) = registered_coordinator(Some(oracle)).await;

    let result = coordinator.request_cross_domain_auth(TEST_DID, TEST_SOURCE_DOMAIN, TEST_TARGET_DOMAIN).await.expect("auth");
    assert!(result.is_authorized());

    let check = coordinator.cross_reference(TEST_DID, &result).await;
    match &check.verdict {
        Verdict::Indeterminate(reason) => assert!(reason.contains(&format!("port {port}"))),
        other => panic!("unexpected verdict {other:?}"),
    }
    assert_eq!(check.ledger_authorized, Some(true));
}

#[tokio::test]
async fn test_cross_reference_when_no_oracle_configured_then_indeterminate() {
    let (_harness, coordinator) = registered_coordinator(None).await;
    assert!(coordinator.oracle().is_none());

    let result = coordinator.request_cross_domain_auth(TEST_DID, TEST_SOURCE_DOMAIN, TEST_TARGET_DOMAIN).await.expect("auth");
    let check = coordinator.cross_reference(TEST_DID, &result).await;
    assert!(matches!(check.verdict, Verdict::Indeterminate(ref reason) if reason.contains("not configured")));
}

#[tokio::test]
async fn test_coordinator_when_session_disconnected_then_reads_and_writes_fail() {
    let (harness, coordinator) = registered_coordinator(None).await;
    assert!(coordinator.devices().check_device_exists(TEST_DID).await);

    harness.session.disconnect();
    assert!(!coordinator.session().is_connected());
    assert!(!coordinator.devices().check_device_exists(TEST_DID).await);
    assert!(coordinator.register_device("did:test:2", "{}").await.is_err());
}
