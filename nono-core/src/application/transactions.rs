use crate::application::session::{LedgerSession, SessionHandles};
use crate::domain::abi::IDeviceRegistry::{registerDeviceCall, requestCrossDomainAuthCall};
use crate::domain::{AuthorizationResult, LedgerReceipt, TransactionResult};
use crate::foundation::{
    validate_did, validate_domain, IdentityError, DEFAULT_DEVICE_METADATA, DEFAULT_GAS_LIMIT, DEFAULT_RECEIPT_POLL_INTERVAL_MS,
};
use crate::infrastructure::config::LedgerConfig;
use crate::infrastructure::ledger::{ContractCall, LedgerRpc};
use alloy::primitives::{Bytes, TxHash};
use alloy::sol_types::SolCall;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitOptions {
    pub gas_limit: u64,
    /// `None` waits for confirmation until cancelled.
    pub confirmation_timeout: Option<Duration>,
    pub poll_interval: Duration,
    /// Skip the session guard that keeps submit+confirm sequential for the account.
    pub allow_concurrent_submissions: bool,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            gas_limit: DEFAULT_GAS_LIMIT,
            confirmation_timeout: None,
            poll_interval: Duration::from_millis(DEFAULT_RECEIPT_POLL_INTERVAL_MS),
            allow_concurrent_submissions: false,
        }
    }
}

impl SubmitOptions {
    pub fn from_config(config: &LedgerConfig) -> Self {
        Self {
            gas_limit: config.gas_limit,
            confirmation_timeout: config.confirmation_timeout(),
            poll_interval: config.receipt_poll_interval(),
            allow_concurrent_submissions: config.allow_concurrent_submissions,
        }
    }
}

/// Submits state-changing contract calls and waits for their confirmation.
pub struct TransactionClient {
    session: Arc<LedgerSession>,
    options: SubmitOptions,
}

impl TransactionClient {
    pub fn new(session: Arc<LedgerSession>, options: SubmitOptions) -> Self {
        Self { session, options }
    }

    pub fn options(&self) -> &SubmitOptions {
        &self.options
    }

    /// Register `did`; empty metadata is stored as `{}`.
    pub async fn register_device(&self, did: &str, metadata: &str) -> Result<TransactionResult, IdentityError> {
        self.register_device_with_cancel(did, metadata, &CancellationToken::new()).await
    }

    /// Cancelling while queued behind another submission gives `SubmissionCancelled` and
    /// broadcasts nothing. Cancelling after broadcast gives `ConfirmationCancelled`.
    pub async fn register_device_with_cancel(
        &self,
        did: &str,
        metadata: &str,
        cancel: &CancellationToken,
    ) -> Result<TransactionResult, IdentityError> {
        let handles = self.session.handles()?;
        let did = validate_did(did)?;
        let metadata = if metadata.trim().is_empty() { DEFAULT_DEVICE_METADATA } else { metadata };
        let input = registerDeviceCall { _did: did.to_string(), _metadata: metadata.to_string() }.abi_encode();
        let receipt = self.submit(&handles, "registerDevice", input.into(), cancel).await?;
        let result = TransactionResult::from_receipt(&receipt);
        info!(
            "device registered did={} tx_hash={} block={} events={} skipped_logs={}",
            did,
            result.tx_hash,
            result.block_number,
            result.events.len(),
            result.skipped_logs
        );
        Ok(result)
    }

    pub async fn request_cross_domain_auth(
        &self,
        did: &str,
        source_domain: &str,
        target_domain: &str,
    ) -> Result<AuthorizationResult, IdentityError> {
        self.request_cross_domain_auth_with_cancel(did, source_domain, target_domain, &CancellationToken::new()).await
    }

    /// Cancelling `cancel` abandons the local wait only; the transaction may still be mined.
    pub async fn request_cross_domain_auth_with_cancel(
        &self,
        did: &str,
        source_domain: &str,
        target_domain: &str,
        cancel: &CancellationToken,
    ) -> Result<AuthorizationResult, IdentityError> {
        let handles = self.session.handles()?;
        let did = validate_did(did)?;
        let source_domain = validate_domain("source_domain", source_domain)?;
        let target_domain = validate_domain("target_domain", target_domain)?;
        let input = requestCrossDomainAuthCall {
            _did: did.to_string(),
            _sourceDomain: source_domain.to_string(),
            _targetDomain: target_domain.to_string(),
        }
        .abi_encode();
        let receipt = self.submit(&handles, "requestCrossDomainAuth", input.into(), cancel).await?;
        let result = AuthorizationResult::from_receipt(&receipt);
        match result.authorized {
            Some(authorized) => info!(
                "cross-domain auth confirmed did={} source={} target={} authorized={} tx_hash={}",
                did,
                source_domain,
                target_domain,
                authorized,
                result.tx_hash()
            ),
            None => warn!(
                "cross-domain auth confirmed without completion event did={} tx_hash={} skipped_logs={}",
                did,
                result.tx_hash(),
                result.transaction.skipped_logs
            ),
        }
        Ok(result)
    }

    /// Decoded result of an already submitted transaction, `None` while unknown or unmined.
    pub async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<AuthorizationResult>, IdentityError> {
        let handles = self.session.handles()?;
        let receipt = handles.rpc.transaction_receipt(tx_hash).await?;
        Ok(receipt.as_ref().map(AuthorizationResult::from_receipt))
    }

    async fn submit(
        &self,
        handles: &SessionHandles,
        operation: &str,
        input: Bytes,
        cancel: &CancellationToken,
    ) -> Result<LedgerReceipt, IdentityError> {
        let _guard = if self.options.allow_concurrent_submissions {
            None
        } else {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled_before_submit(operation)),
                guard = self.session.submission_guard().lock() => Some(guard),
            }
        };
        if cancel.is_cancelled() {
            return Err(cancelled_before_submit(operation));
        }

        let gas_limit = self.options.gas_limit;
        let call = ContractCall { from: handles.account, to: handles.contract, input, gas_limit };
        let tx_hash = handles.rpc.send_transaction(call).await?;
        info!("transaction submitted op={} tx_hash={} from={} gas_limit={}", operation, tx_hash, handles.account, gas_limit);

        let receipt = self.await_confirmation(handles.rpc.as_ref(), tx_hash, cancel).await?;
        if !receipt.status {
            warn!("transaction failed op={} tx_hash={} gas_used={} gas_limit={}", operation, tx_hash, receipt.gas_used, gas_limit);
            if receipt.gas_used >= gas_limit {
                return Err(IdentityError::GasExhausted {
                    gas_limit,
                    details: format!("tx_hash={tx_hash} gas_used={}", receipt.gas_used),
                });
            }
            return Err(IdentityError::TransactionReverted { tx_hash: tx_hash.to_string() });
        }
        Ok(receipt)
    }

    async fn await_confirmation(
        &self,
        rpc: &dyn LedgerRpc,
        tx_hash: TxHash,
        cancel: &CancellationToken,
    ) -> Result<LedgerReceipt, IdentityError> {
        let poll = poll_receipt(rpc, tx_hash, self.options.poll_interval);
        let bounded = async {
            match self.options.confirmation_timeout {
                Some(timeout) => match tokio::time::timeout(timeout, poll).await {
                    Ok(result) => result,
                    Err(_) => Err(IdentityError::ConfirmationTimeout {
                        tx_hash: tx_hash.to_string(),
                        timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    }),
                },
                None => poll.await,
            }
        };
        tokio::select! {
            _ = cancel.cancelled() => {
                warn!("confirmation wait cancelled tx_hash={}", tx_hash);
                Err(IdentityError::ConfirmationCancelled { tx_hash: tx_hash.to_string() })
            }
            result = bounded => result,
        }
    }
}

fn cancelled_before_submit(operation: &str) -> IdentityError {
    warn!("submission cancelled while queued op={}", operation);
    IdentityError::SubmissionCancelled { operation: operation.to_string() }
}

/// Poll until the receipt appears. Transient lookup errors keep polling; the caller's
/// timeout or cancellation bounds the wait.
async fn poll_receipt(rpc: &dyn LedgerRpc, tx_hash: TxHash, interval: Duration) -> Result<LedgerReceipt, IdentityError> {
    let mut attempts: u64 = 0;
    let mut failing = false;
    loop {
        attempts += 1;
        match rpc.transaction_receipt(tx_hash).await {
            Ok(Some(receipt)) => {
                debug!("transaction confirmed tx_hash={} block={} polls={}", tx_hash, receipt.block_number, attempts);
                return Ok(receipt);
            }
            Ok(None) => failing = false,
            Err(err) if err.is_retryable() => {
                if !failing {
                    warn!("receipt lookup failed, still waiting tx_hash={} polls={}: {}", tx_hash, attempts, err);
                }
                failing = true;
            }
            Err(err) => {
                return Err(IdentityError::ConfirmationFailed { tx_hash: tx_hash.to_string(), details: err.to_string() });
            }
        }
        tokio::time::sleep(interval).await;
    }
}
