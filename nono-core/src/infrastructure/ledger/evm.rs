use super::{ConnectParams, ContractCall, LedgerConnector, LedgerRpc, OpenedLedger, SignerMode};
use crate::domain::LedgerReceipt;
use crate::foundation::util::url::redact_url;
use crate::foundation::IdentityError;
use alloy::network::{Ethereum, EthereumWallet};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::http::{Client, Http};
use alloy::transports::{RpcError, TransportError};
use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

/// `LedgerRpc` backed by an alloy HTTP provider.
pub struct AlloyLedgerRpc<P> {
    provider: P,
}

impl<P> AlloyLedgerRpc<P>
where
    P: Provider<Http<Client>, Ethereum> + 'static,
{
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P> LedgerRpc for AlloyLedgerRpc<P>
where
    P: Provider<Http<Client>, Ethereum> + 'static,
{
    async fn chain_id(&self) -> Result<u64, IdentityError> {
        self.provider.get_chain_id().await.map_err(|err| map_read_error("eth_chainId", err))
    }

    async fn balance(&self, account: Address) -> Result<U256, IdentityError> {
        self.provider.get_balance(account).await.map_err(|err| map_read_error("eth_getBalance", err))
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, IdentityError> {
        let tx = TransactionRequest::default().to(to).input(input.into());
        self.provider.call(&tx).await.map_err(|err| map_read_error("eth_call", err))
    }

    async fn send_transaction(&self, call: ContractCall) -> Result<TxHash, IdentityError> {
        let gas_limit = call.gas_limit;
        let tx = TransactionRequest::default().from(call.from).to(call.to).input(call.input.into()).gas_limit(gas_limit);
        let pending = self.provider.send_transaction(tx).await.map_err(|err| map_send_error(gas_limit, err))?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<LedgerReceipt>, IdentityError> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|err| map_read_error("eth_getTransactionReceipt", err))?;
        Ok(receipt.map(|receipt| to_ledger_receipt(&receipt)))
    }
}

fn to_ledger_receipt(receipt: &TransactionReceipt) -> LedgerReceipt {
    LedgerReceipt {
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number.unwrap_or_default(),
        gas_used: u64::try_from(receipt.gas_used).unwrap_or(u64::MAX),
        status: receipt.status(),
        logs: receipt.inner.logs().iter().map(|log| log.inner.clone()).collect(),
    }
}

fn map_read_error(operation: &str, err: TransportError) -> IdentityError {
    match err {
        RpcError::Transport(kind) => IdentityError::NetworkError(format!("{operation}: {kind}")),
        other => IdentityError::query(operation, other),
    }
}

fn map_send_error(gas_limit: u64, err: TransportError) -> IdentityError {
    let details = err.to_string();
    if is_gas_exhaustion(&details) {
        return IdentityError::GasExhausted { gas_limit, details };
    }
    match err {
        RpcError::Transport(kind) => IdentityError::NetworkError(format!("eth_sendTransaction: {kind}")),
        _ => IdentityError::query("eth_sendTransaction", details),
    }
}

/// Node rejection messages that mean the transaction cannot fit in the gas ceiling.
pub(crate) fn is_gas_exhaustion(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("out of gas")
        || lower.contains("intrinsic gas too low")
        || lower.contains("gas required exceeds")
        || lower.contains("exceeds block gas limit")
}

/// Opens alloy HTTP providers: a wallet-filled provider for local keys, or a plain
/// provider against the wallet endpoint (which signs via `eth_sendTransaction`).
#[derive(Clone, Debug, Default)]
pub struct AlloyConnector;

#[async_trait]
impl LedgerConnector for AlloyConnector {
    async fn open(&self, params: &ConnectParams) -> Result<OpenedLedger, IdentityError> {
        match &params.signer {
            SignerMode::LocalKey(signer) => {
                let account = signer.address();
                let wallet = EthereumWallet::from(signer.clone());
                let provider = ProviderBuilder::new().with_recommended_fillers().wallet(wallet).on_http(params.rpc_url.clone());
                info!("ledger provider opened mode=local_key rpc_url={} account={}", redact_url(params.rpc_url.as_str()), account);
                Ok(OpenedLedger { rpc: Arc::new(AlloyLedgerRpc::new(provider)), account })
            }
            SignerMode::ExternalWallet { endpoint } => {
                let endpoint = endpoint
                    .clone()
                    .ok_or_else(|| IdentityError::ProviderUnavailable("no wallet endpoint configured".to_string()))?;
                let provider = ProviderBuilder::new().with_recommended_fillers().on_http(endpoint.clone());
                let accounts = provider.get_accounts().await.map_err(|err| match err {
                    RpcError::Transport(kind) => {
                        IdentityError::ProviderUnavailable(format!("wallet endpoint {} unreachable: {kind}", redact_url(endpoint.as_str())))
                    }
                    other => IdentityError::ProviderUnavailable(format!("eth_accounts failed: {other}")),
                })?;
                let account = accounts
                    .first()
                    .copied()
                    .ok_or_else(|| IdentityError::ProviderUnavailable("wallet exposes no accounts".to_string()))?;
                debug!("wallet accounts available count={}", accounts.len());
                info!("ledger provider opened mode=external_wallet endpoint={} account={}", redact_url(endpoint.as_str()), account);
                Ok(OpenedLedger { rpc: Arc::new(AlloyLedgerRpc::new(provider)), account })
            }
        }
    }
}
