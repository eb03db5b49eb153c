use crate::domain::event::{authorized_from_events, decode_logs, DomainEvent};
use crate::domain::receipt::LedgerReceipt;
use alloy::primitives::TxHash;
use serde::Serialize;

/// Outcome of a confirmed contract transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransactionResult {
    pub success: bool,
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub gas_used: u64,
    pub events: Vec<DomainEvent>,
    pub skipped_logs: usize,
}

impl TransactionResult {
    pub fn from_receipt(receipt: &LedgerReceipt) -> Self {
        let decoded = decode_logs(&receipt.logs);
        Self {
            success: receipt.status,
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            events: decoded.events,
            skipped_logs: decoded.skipped,
        }
    }

    pub fn events_for<'a>(&'a self, did: &'a str) -> impl Iterator<Item = &'a DomainEvent> + 'a {
        self.events.iter().filter(move |event| event.concerns(did))
    }
}

/// Outcome of `requestCrossDomainAuth`.
///
/// `authorized == None` means the transaction succeeded but no completion event was
/// emitted; it is a distinct outcome, not a failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthorizationResult {
    #[serde(flatten)]
    pub transaction: TransactionResult,
    pub authorized: Option<bool>,
}

impl AuthorizationResult {
    pub fn from_receipt(receipt: &LedgerReceipt) -> Self {
        let transaction = TransactionResult::from_receipt(receipt);
        let authorized = authorized_from_events(&transaction.events);
        Self { transaction, authorized }
    }

    pub fn success(&self) -> bool {
        self.transaction.success
    }

    pub fn tx_hash(&self) -> TxHash {
        self.transaction.tx_hash
    }

    pub fn events(&self) -> &[DomainEvent] {
        &self.transaction.events
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized == Some(true)
    }
}
