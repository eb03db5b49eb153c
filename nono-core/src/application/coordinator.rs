use crate::application::devices::DeviceReader;
use crate::application::session::LedgerSession;
use crate::application::transactions::{SubmitOptions, TransactionClient};
use crate::domain::{reconcile, AuthorizationResult, CrossCheck, CrossCheckInputs, DevicePresence, TransactionResult};
use crate::foundation::IdentityError;
use crate::infrastructure::oracle::{ConsensusStatus, OracleClient};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Front door for device flows: ledger transactions plus an optional oracle cross-check.
///
/// Ledger calls never wait on the oracle. The cross-check is a separate, caller-invoked step.
pub struct AuthorizationCoordinator {
    session: Arc<LedgerSession>,
    transactions: TransactionClient,
    devices: DeviceReader,
    oracle: Option<OracleClient>,
}

impl AuthorizationCoordinator {
    pub fn new(session: Arc<LedgerSession>, options: SubmitOptions, oracle: Option<OracleClient>) -> Self {
        Self {
            transactions: TransactionClient::new(session.clone(), options),
            devices: DeviceReader::new(session.clone()),
            session,
            oracle,
        }
    }

    pub fn session(&self) -> &Arc<LedgerSession> {
        &self.session
    }

    pub fn transactions(&self) -> &TransactionClient {
        &self.transactions
    }

    pub fn devices(&self) -> &DeviceReader {
        &self.devices
    }

    pub fn oracle(&self) -> Option<&OracleClient> {
        self.oracle.as_ref()
    }

    pub async fn register_device(&self, did: &str, metadata: &str) -> Result<TransactionResult, IdentityError> {
        self.transactions.register_device(did, metadata).await
    }

    pub async fn request_cross_domain_auth(
        &self,
        did: &str,
        source_domain: &str,
        target_domain: &str,
    ) -> Result<AuthorizationResult, IdentityError> {
        self.transactions.request_cross_domain_auth(did, source_domain, target_domain).await
    }

    pub async fn request_cross_domain_auth_with_cancel(
        &self,
        did: &str,
        source_domain: &str,
        target_domain: &str,
        cancel: &CancellationToken,
    ) -> Result<AuthorizationResult, IdentityError> {
        self.transactions.request_cross_domain_auth_with_cancel(did, source_domain, target_domain, cancel).await
    }

    /// Compare an authorization outcome with the current on-chain record and the
    /// oracle consensus. Both are read concurrently; failures show up in the verdict.
    pub async fn cross_reference(&self, did: &str, result: &AuthorizationResult) -> CrossCheck {
        let (presence, consensus) = tokio::join!(self.devices.device_presence(did), self.oracle_consensus(did));

        let ledger_status = match &presence {
            DevicePresence::Exists(record) => Some(record.status),
            DevicePresence::Absent => None,
            DevicePresence::QueryFailed(err) => {
                debug!("cross-check ledger read failed did={} error={}", did, err);
                None
            }
        };
        let inputs = match consensus {
            Ok(consensus) => CrossCheckInputs {
                ledger_authorized: result.authorized,
                ledger_status,
                oracle_status: consensus.status(),
                oracle_consensus_reached: consensus.consensus_reached,
                oracle_error: None,
            },
            Err(err) => CrossCheckInputs {
                ledger_authorized: result.authorized,
                ledger_status,
                oracle_error: Some(err.to_string()),
                ..CrossCheckInputs::default()
            },
        };

        let check = reconcile(did, inputs);
        if check.verdict.is_consistent() {
            info!("cross-check consistent did={} authorized={:?}", did, check.ledger_authorized);
        } else {
            warn!("cross-check not consistent did={} verdict={:?}", did, check.verdict);
        }
        check
    }

    async fn oracle_consensus(&self, did: &str) -> Result<ConsensusStatus, IdentityError> {
        match &self.oracle {
            Some(oracle) => oracle.consensus_status(did).await,
            None => Err(IdentityError::Message("oracle client not configured".to_string())),
        }
    }
}
