use crate::fixtures::{LedgerConfigBuilder, LedgerHarness, TEST_ACCOUNT_ADDRESS, TEST_WALLET_ACCOUNT};
use alloy::primitives::{Address, U256};
use nono_core::foundation::{ErrorCode, IdentityError, LOCAL_NETWORK_NAME};
use nono_core::infrastructure::ledger::InMemoryConnector;

#[tokio::test]
async fn test_session_lifecycle_when_connect_then_disconnect_then_flags_follow() {
    let harness = LedgerHarness::new();
    assert!(!harness.session.is_connected());

    let info = harness.session.connect(&LedgerConfigBuilder::default().build()).await.expect("connect");
    assert!(harness.session.is_connected());
    assert_eq!(info.address, TEST_ACCOUNT_ADDRESS.parse::<Address>().expect("address"));
    assert_eq!(info.network.chain_id, 31337);
    assert_eq!(info.network.name, LOCAL_NETWORK_NAME);
    assert_eq!(harness.session.network().expect("network"), info.network);

    harness.session.disconnect();
    assert!(!harness.session.is_connected());
    harness.session.disconnect();
    assert!(!harness.session.is_connected());
}

#[tokio::test]
async fn test_session_when_not_connected_then_accessors_fail() {
    let harness = LedgerHarness::new();
    assert!(matches!(harness.session.get_address(), Err(IdentityError::NotConnected)));
    assert!(matches!(harness.session.get_balance().await, Err(IdentityError::NotConnected)));
    assert!(matches!(harness.session.network(), Err(IdentityError::NotConnected)));
}

#[tokio::test]
async fn test_session_when_private_key_missing_then_config_error_before_network() {
    let harness = LedgerHarness::new();
    let config = LedgerConfigBuilder::default().private_key(None).build();
    let err = harness.session.connect(&config).await.expect_err("must fail");
    assert_eq!(err.code(), ErrorCode::ConfigError);
    assert_eq!(harness.connector.open_count(), 0);
    assert!(!harness.session.is_connected());
}

#[tokio::test]
async fn test_session_when_contract_or_key_invalid_then_config_error() {
    let harness = LedgerHarness::new();
    for config in [
        LedgerConfigBuilder::default().contract_address("").build(),
        LedgerConfigBuilder::default().contract_address("0xnot-an-address").build(),
        LedgerConfigBuilder::default().private_key(Some("0x1234")).build(),
        LedgerConfigBuilder::default().rpc_url("ws//broken").build(),
    ] {
        let err = harness.session.connect(&config).await.expect_err("must fail");
        assert!(matches!(err, IdentityError::ConfigError(_)), "{err}");
    }
    assert_eq!(harness.connector.open_count(), 0);
}

#[tokio::test]
async fn test_session_when_private_key_invalid_then_message_hides_key() {
    let harness = LedgerHarness::new();
    let config = LedgerConfigBuilder::default().private_key(Some("0xzzzz-secret-material")).build();
    let err = harness.session.connect(&config).await.expect_err("must fail");
    assert!(!err.to_string().contains("secret-material"));
}

#[tokio::test]
async fn test_session_when_external_wallet_without_endpoint_then_provider_unavailable() {
    let harness = LedgerHarness::new();
    let err = harness.session.connect(&LedgerConfigBuilder::default().external_wallet(None).build()).await.expect_err("must fail");
    assert!(matches!(err, IdentityError::ProviderUnavailable(_)));
    assert_eq!(harness.connector.open_count(), 0);
}

#[tokio::test]
async fn test_session_when_external_wallet_has_no_accounts_then_provider_unavailable() {
    let harness = LedgerHarness::new();
    let config = LedgerConfigBuilder::default().external_wallet(Some("http://127.0.0.1:1248")).build();
    let err = harness.session.connect(&config).await.expect_err("must fail");
    assert!(matches!(err, IdentityError::ProviderUnavailable(_)));
}

#[tokio::test]
async fn test_session_when_external_wallet_exposes_account_then_first_used() {
    let wallet_account: Address = TEST_WALLET_ACCOUNT.parse().expect("address");
    let harness = LedgerHarness::with_connector(|ledger| InMemoryConnector::new(ledger).with_wallet_accounts(vec![wallet_account]));
    let config = LedgerConfigBuilder::default().external_wallet(Some("http://127.0.0.1:1248")).build();
    let info = harness.session.connect(&config).await.expect("connect");
    assert_eq!(info.address, wallet_account);
}

#[tokio::test]
async fn test_session_when_rpc_unreachable_then_network_error_and_disconnected() {
    let harness = LedgerHarness::new();
    harness.ledger.set_unreachable(true);
    let err = harness.session.connect(&LedgerConfigBuilder::default().build()).await.expect_err("must fail");
    assert!(matches!(err, IdentityError::NetworkError(_)));
    assert!(!harness.session.is_connected());
}

#[tokio::test]
async fn test_session_balance_when_funded_then_ether_text() {
    let harness = LedgerHarness::connected().await;
    let account = harness.session.get_address().expect("address");
    harness.ledger.set_balance(account, U256::from(1_500_000_000_000_000_000u128));
    assert_eq!(harness.session.get_balance_wei().await.expect("wei"), U256::from(1_500_000_000_000_000_000u128));
    assert_eq!(harness.session.get_balance().await.expect("balance"), "1.500000000000000000");
}
