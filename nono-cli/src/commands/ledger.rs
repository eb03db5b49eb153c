use super::print_json;
use crate::cli::{AuthArgs, RegisterArgs};
use alloy::primitives::{Address, TxHash};
use log::{info, warn};
use nono_core::application::{AuthorizationCoordinator, LedgerSession, SubmitOptions};
use nono_core::domain::{AuthorizationResult, CrossCheck};
use nono_core::foundation::{IdentityError, NetworkInfo};
use nono_core::infrastructure::config::AppConfig;
use nono_core::infrastructure::oracle::OracleClient;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Serialize)]
struct InfoReport {
    address: Address,
    network: NetworkInfo,
    contract: Address,
    balance: String,
}

#[derive(Serialize)]
struct AuthReport {
    #[serde(flatten)]
    result: AuthorizationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    cross_check: Option<CrossCheck>,
}

#[derive(Serialize)]
struct ExistsReport<'a> {
    did: &'a str,
    exists: bool,
}

async fn connect(app_config: &AppConfig) -> Result<Arc<LedgerSession>, IdentityError> {
    let session = Arc::new(LedgerSession::with_alloy());
    session.connect(&app_config.ledger).await?;
    Ok(session)
}

fn submit_options(app_config: &AppConfig, timeout_secs: Option<u64>) -> SubmitOptions {
    let mut options = SubmitOptions::from_config(&app_config.ledger);
    if let Some(secs) = timeout_secs.filter(|secs| *secs > 0) {
        options.confirmation_timeout = Some(Duration::from_secs(secs));
    }
    options
}

/// Token cancelled on ctrl-c, so a long confirmation wait can be abandoned.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; abandoning confirmation wait");
            on_signal.cancel();
        }
    });
    cancel
}

pub async fn info(app_config: &AppConfig) -> Result<(), IdentityError> {
    let session = connect(app_config).await?;
    let report = InfoReport {
        address: session.get_address()?,
        network: session.network()?,
        contract: session.contract_address()?,
        balance: session.get_balance().await?,
    };
    session.disconnect();
    print_json(&report)
}

pub async fn register(app_config: &AppConfig, args: RegisterArgs) -> Result<(), IdentityError> {
    let session = connect(app_config).await?;
    let coordinator = AuthorizationCoordinator::new(session.clone(), submit_options(app_config, args.timeout_secs), None);
    let result = coordinator.transactions().register_device_with_cancel(&args.did, &args.metadata, &cancel_on_ctrl_c()).await?;
    session.disconnect();
    print_json(&result)
}

pub async fn auth(app_config: &AppConfig, args: AuthArgs) -> Result<(), IdentityError> {
    let session = connect(app_config).await?;
    let oracle = if args.cross_check { Some(OracleClient::new(&app_config.oracle)?) } else { None };
    let coordinator = AuthorizationCoordinator::new(session.clone(), submit_options(app_config, args.timeout_secs), oracle);

    let result = coordinator
        .request_cross_domain_auth_with_cancel(&args.did, &args.source_domain, &args.target_domain, &cancel_on_ctrl_c())
        .await?;
    let cross_check = if args.cross_check { Some(coordinator.cross_reference(&args.did, &result).await) } else { None };
    if let Some(check) = &cross_check {
        info!("cross-check finished did={} consistent={}", args.did, check.verdict.is_consistent());
    }
    session.disconnect();
    print_json(&AuthReport { result, cross_check })
}

pub async fn device(app_config: &AppConfig, did: &str) -> Result<(), IdentityError> {
    let session = connect(app_config).await?;
    let coordinator = AuthorizationCoordinator::new(session, SubmitOptions::from_config(&app_config.ledger), None);
    print_json(&coordinator.devices().get_device(did).await?)
}

pub async fn exists(app_config: &AppConfig, did: &str) -> Result<(), IdentityError> {
    let session = connect(app_config).await?;
    let coordinator = AuthorizationCoordinator::new(session, SubmitOptions::from_config(&app_config.ledger), None);
    let exists = coordinator.devices().check_device_exists(did).await;
    print_json(&ExistsReport { did, exists })
}

pub async fn receipt(app_config: &AppConfig, tx_hash: TxHash) -> Result<(), IdentityError> {
    let session = connect(app_config).await?;
    let coordinator = AuthorizationCoordinator::new(session, SubmitOptions::from_config(&app_config.ledger), None);
    let receipt = coordinator.transactions().transaction_receipt(tx_hash).await?;
    if receipt.is_none() {
        warn!("transaction not found or not yet mined tx_hash={}", tx_hash);
    }
    print_json(&receipt)
}
