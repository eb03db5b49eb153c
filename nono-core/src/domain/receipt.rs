use alloy::primitives::{Log, TxHash};

/// Backend-neutral view of a mined transaction receipt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerReceipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub gas_used: u64,
    /// `true` when the transaction executed without reverting.
    pub status: bool,
    pub logs: Vec<Log>,
}
