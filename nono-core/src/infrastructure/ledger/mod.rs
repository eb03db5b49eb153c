use crate::domain::LedgerReceipt;
use crate::foundation::util::url::parse_base_url;
use crate::foundation::IdentityError;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use reqwest::Url;
use std::fmt;
use std::sync::Arc;

pub mod evm;
pub mod memory;

pub use evm::{AlloyConnector, AlloyLedgerRpc};
pub use memory::{InMemoryConnector, InMemoryLedger};

/// State-changing contract call, ready for submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractCall {
    pub from: Address,
    pub to: Address,
    pub input: Bytes,
    pub gas_limit: u64,
}

/// JSON-RPC surface the session and transaction client need from a ledger node.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    async fn chain_id(&self) -> Result<u64, IdentityError>;
    async fn balance(&self, account: Address) -> Result<U256, IdentityError>;
    /// Read-only `eth_call` against `to`.
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, IdentityError>;
    /// Submit and return the transaction hash without waiting for inclusion.
    async fn send_transaction(&self, call: ContractCall) -> Result<TxHash, IdentityError>;
    /// `Ok(None)` while the transaction is unknown or not yet mined.
    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<LedgerReceipt>, IdentityError>;
}

/// How transactions get signed.
#[derive(Clone)]
pub enum SignerMode {
    /// Local deterministic signer derived from the configured private key.
    LocalKey(PrivateKeySigner),
    /// Account selection and signing delegated to a wallet JSON-RPC endpoint.
    ExternalWallet { endpoint: Option<Url> },
}

impl fmt::Debug for SignerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignerMode::LocalKey(signer) => f.debug_tuple("LocalKey").field(&signer.address()).finish(),
            SignerMode::ExternalWallet { endpoint } => {
                f.debug_struct("ExternalWallet").field("endpoint", &endpoint.as_ref().map(Url::as_str)).finish()
            }
        }
    }
}

/// Validated connection parameters. Building these never touches the network.
#[derive(Clone, Debug)]
pub struct ConnectParams {
    pub rpc_url: Url,
    pub contract_address: Address,
    pub signer: SignerMode,
}

impl ConnectParams {
    pub fn from_config(config: &crate::infrastructure::config::LedgerConfig) -> Result<Self, IdentityError> {
        use secrecy::ExposeSecret;

        let contract_raw = config.contract_address.trim();
        if contract_raw.is_empty() {
            return Err(IdentityError::config("ledger.contract_address is required"));
        }
        let contract_address = contract_raw
            .parse::<Address>()
            .map_err(|err| IdentityError::config(format!("invalid ledger.contract_address={contract_raw}: {err}")))?;

        let signer = if config.use_external_wallet {
            let endpoint = match config.wallet_rpc_url.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                Some(raw) => Some(parse_base_url("ledger.wallet_rpc_url", raw)?),
                None => None,
            };
            SignerMode::ExternalWallet { endpoint }
        } else {
            let key = config
                .private_key
                .as_ref()
                .map(|key| key.expose_secret().trim().to_string())
                .filter(|key| !key.is_empty())
                .ok_or_else(|| IdentityError::config("ledger.private_key is required unless ledger.use_external_wallet=true"))?;
            let signer = key
                .parse::<PrivateKeySigner>()
                .map_err(|_| IdentityError::config("ledger.private_key is not a valid secp256k1 private key"))?;
            SignerMode::LocalKey(signer)
        };

        let rpc_url = parse_base_url("ledger.rpc_url", &config.rpc_url)?;
        Ok(Self { rpc_url, contract_address, signer })
    }
}

/// Provider handle plus the account that will send transactions.
pub struct OpenedLedger {
    pub rpc: Arc<dyn LedgerRpc>,
    pub account: Address,
}

/// Builds provider handles for a session.
#[async_trait]
pub trait LedgerConnector: Send + Sync {
    async fn open(&self, params: &ConnectParams) -> Result<OpenedLedger, IdentityError>;
}
