use crate::foundation::util::url::redact_url;
use crate::foundation::{IdentityError, NetworkInfo};
use crate::infrastructure::config::LedgerConfig;
use crate::infrastructure::ledger::{AlloyConnector, ConnectParams, LedgerConnector, LedgerRpc, SignerMode};
use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, U256};
use log::{debug, info};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

/// Everything a connected session holds. Installed and removed as one unit.
pub struct SessionHandles {
    pub rpc: Arc<dyn LedgerRpc>,
    pub account: Address,
    pub contract: Address,
    pub network: NetworkInfo,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub address: Address,
    pub network: NetworkInfo,
}

/// Caller-owned ledger session.
///
/// Operations capture the current handles once at their start, so a concurrent
/// `disconnect` never affects a call already in flight and every later call sees
/// `NotConnected`.
///
/// The session also owns the submission guard, so every transaction client built on
/// it shares one submit+confirm queue for the session account.
pub struct LedgerSession {
    connector: Arc<dyn LedgerConnector>,
    handles: RwLock<Option<Arc<SessionHandles>>>,
    submission_guard: tokio::sync::Mutex<()>,
}

impl LedgerSession {
    pub fn new(connector: Arc<dyn LedgerConnector>) -> Self {
        Self { connector, handles: RwLock::new(None), submission_guard: tokio::sync::Mutex::new(()) }
    }

    /// Session over alloy HTTP providers.
    pub fn with_alloy() -> Self {
        Self::new(Arc::new(AlloyConnector))
    }

    /// Validate `config`, open a provider and resolve account and network.
    ///
    /// Configuration problems are reported before any network call. Connecting an
    /// already connected session replaces its handles.
    pub async fn connect(&self, config: &LedgerConfig) -> Result<SessionInfo, IdentityError> {
        let params = ConnectParams::from_config(config)?;
        if let SignerMode::ExternalWallet { endpoint: None } = &params.signer {
            return Err(IdentityError::ProviderUnavailable(
                "external wallet mode selected but ledger.wallet_rpc_url is not set".to_string(),
            ));
        }
        debug!("ledger connect rpc_url={} signer={:?}", redact_url(params.rpc_url.as_str()), params.signer);

        let opened = self.connector.open(&params).await?;
        let chain_id = opened.rpc.chain_id().await?;
        let network = NetworkInfo::from_chain_id(chain_id);
        let handles = Arc::new(SessionHandles {
            rpc: opened.rpc,
            account: opened.account,
            contract: params.contract_address,
            network: network.clone(),
        });
        *self.handles.write() = Some(handles);

        info!(
            "ledger session connected account={} chain_id={} network={} contract={}",
            opened.account, network.chain_id, network.name, params.contract_address
        );
        Ok(SessionInfo { address: opened.account, network })
    }

    pub fn is_connected(&self) -> bool {
        self.handles.read().is_some()
    }

    /// Current handles, or `NotConnected`.
    pub fn handles(&self) -> Result<Arc<SessionHandles>, IdentityError> {
        self.handles.read().clone().ok_or(IdentityError::NotConnected)
    }

    pub(crate) fn submission_guard(&self) -> &tokio::sync::Mutex<()> {
        &self.submission_guard
    }

    pub fn get_address(&self) -> Result<Address, IdentityError> {
        Ok(self.handles()?.account)
    }

    pub fn network(&self) -> Result<NetworkInfo, IdentityError> {
        Ok(self.handles()?.network.clone())
    }

    pub fn contract_address(&self) -> Result<Address, IdentityError> {
        Ok(self.handles()?.contract)
    }

    pub async fn get_balance_wei(&self) -> Result<U256, IdentityError> {
        let handles = self.handles()?;
        handles.rpc.balance(handles.account).await
    }

    /// Balance of the session account in ether, as decimal text.
    pub async fn get_balance(&self) -> Result<String, IdentityError> {
        Ok(format_ether(self.get_balance_wei().await?))
    }

    /// Drop all session state. Idempotent.
    pub fn disconnect(&self) {
        if self.handles.write().take().is_some() {
            info!("ledger session disconnected");
        }
    }
}
