//! In-process contract simulator implementing [`LedgerRpc`].
//!
//! Mirrors the device registry contract closely enough to exercise the session,
//! transaction and reader flows without a node: registration, cross-domain auth
//! events, gas ceilings and reverts. Failure modes are toggled at runtime.

use super::{ConnectParams, ContractCall, LedgerConnector, LedgerRpc, OpenedLedger, SignerMode};
use crate::domain::abi::IDeviceRegistry::{
    devicesCall, registerDeviceCall, requestCrossDomainAuthCall, CrossDomainAuthCompleted, CrossDomainAuthRequested,
    DeviceRegistered,
};
use crate::domain::event::did_topic;
use crate::domain::{DeviceStatus, LedgerReceipt, RawDeviceRecord};
use crate::foundation::{IdentityError, LOCAL_CHAIN_ID};
use alloy::primitives::{keccak256, Address, Bytes, Log, TxHash, B256, U256};
use alloy::sol_types::{SolCall, SolEvent};
use async_trait::async_trait;
use log::{debug, trace};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

pub const REGISTER_DEVICE_GAS: u64 = 120_000;
pub const CROSS_DOMAIN_AUTH_GAS: u64 = 90_000;
const REVERT_GAS: u64 = 30_000;
const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

#[derive(Default)]
struct LedgerState {
    devices: HashMap<String, RawDeviceRecord>,
    receipts: HashMap<TxHash, LedgerReceipt>,
    held: Vec<LedgerReceipt>,
    balances: HashMap<Address, U256>,
    submitted: Vec<ContractCall>,
    block_number: u64,
}

pub struct InMemoryLedger {
    contract: Address,
    chain_id: u64,
    state: Mutex<LedgerState>,
    clock: AtomicU64,
    hold_confirmations: AtomicBool,
    unreachable: AtomicBool,
    fail_queries: AtomicBool,
    reject_for_gas: AtomicBool,
    emit_completion: AtomicBool,
    foreign_logs: AtomicBool,
}

impl InMemoryLedger {
    pub fn new(contract: Address) -> Self {
        Self::with_chain_id(contract, LOCAL_CHAIN_ID)
    }

    pub fn with_chain_id(contract: Address, chain_id: u64) -> Self {
        Self {
            contract,
            chain_id,
            state: Mutex::new(LedgerState::default()),
            clock: AtomicU64::new(GENESIS_TIMESTAMP),
            hold_confirmations: AtomicBool::new(false),
            unreachable: AtomicBool::new(false),
            fail_queries: AtomicBool::new(false),
            reject_for_gas: AtomicBool::new(false),
            emit_completion: AtomicBool::new(true),
            foreign_logs: AtomicBool::new(false),
        }
    }

    pub fn contract_address(&self) -> Address {
        self.contract
    }

    /// While set, receipts are kept back and look unmined. Clearing releases them.
    pub fn set_hold_confirmations(&self, hold: bool) {
        self.hold_confirmations.store(hold, Ordering::SeqCst);
        if !hold {
            self.release_confirmations();
        }
    }

    pub fn release_confirmations(&self) {
        let mut state = self.state.lock();
        let held = std::mem::take(&mut state.held);
        for receipt in held {
            state.receipts.insert(receipt.tx_hash, receipt);
        }
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn set_fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Reject submissions at the node, the way a node reports an exceeded gas allowance.
    pub fn set_reject_for_gas(&self, reject: bool) {
        self.reject_for_gas.store(reject, Ordering::SeqCst);
    }

    pub fn set_emit_completion(&self, emit: bool) {
        self.emit_completion.store(emit, Ordering::SeqCst);
    }

    /// Append a log from an unrelated contract to every receipt.
    pub fn set_foreign_logs(&self, enabled: bool) {
        self.foreign_logs.store(enabled, Ordering::SeqCst);
    }

    pub fn set_balance(&self, account: Address, wei: U256) {
        self.state.lock().balances.insert(account, wei);
    }

    pub fn set_device_status(&self, did: &str, status: DeviceStatus) -> bool {
        let now = self.tick();
        let mut state = self.state.lock();
        match state.devices.get_mut(did) {
            Some(record) => {
                record.status = status.as_u8();
                record.last_updated = U256::from(now);
                true
            }
            None => false,
        }
    }

    /// Store a raw record as-is, bypassing registration rules.
    pub fn put_raw_device(&self, did: &str, record: RawDeviceRecord) {
        self.state.lock().devices.insert(did.to_string(), record);
    }

    pub fn submitted_count(&self) -> usize {
        self.state.lock().submitted.len()
    }

    pub fn submitted(&self) -> Vec<ContractCall> {
        self.state.lock().submitted.clone()
    }

    pub fn held_count(&self) -> usize {
        self.state.lock().held.len()
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::SeqCst)
    }

    fn ensure_reachable(&self) -> Result<(), IdentityError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(IdentityError::NetworkError("connection refused".to_string()));
        }
        Ok(())
    }

    fn execute(&self, state: &mut LedgerState, call: &ContractCall) -> Result<(bool, u64, Vec<Log>), IdentityError> {
        if call.to != self.contract {
            return Ok((false, REVERT_GAS.min(call.gas_limit), Vec::new()));
        }
        if let Ok(register) = registerDeviceCall::abi_decode(&call.input, true) {
            if call.gas_limit < REGISTER_DEVICE_GAS {
                return Ok((false, call.gas_limit, Vec::new()));
            }
            if state.devices.get(&register._did).map(|record| record.exists).unwrap_or(false) {
                return Ok((false, REVERT_GAS, Vec::new()));
            }
            let now = self.tick();
            state.devices.insert(
                register._did.clone(),
                RawDeviceRecord {
                    did: register._did.clone(),
                    metadata: register._metadata,
                    status: DeviceStatus::Active.as_u8(),
                    owner: call.from,
                    registered_at: U256::from(now),
                    last_updated: U256::from(now),
                    exists: true,
                },
            );
            let event = DeviceRegistered { did: did_topic(&register._did), owner: call.from, timestamp: U256::from(now) };
            return Ok((true, REGISTER_DEVICE_GAS, vec![self.log(event.encode_log_data())]));
        }
        if let Ok(auth) = requestCrossDomainAuthCall::abi_decode(&call.input, true) {
            if call.gas_limit < CROSS_DOMAIN_AUTH_GAS {
                return Ok((false, call.gas_limit, Vec::new()));
            }
            let did_hash = did_topic(&auth._did);
            let mut logs = vec![self.log(
                CrossDomainAuthRequested {
                    did: did_hash,
                    sourceDomain: auth._sourceDomain.clone(),
                    targetDomain: auth._targetDomain.clone(),
                }
                .encode_log_data(),
            )];
            if self.emit_completion.load(Ordering::SeqCst) {
                let authorized = state
                    .devices
                    .get(&auth._did)
                    .map(|record| record.exists && record.status == DeviceStatus::Active.as_u8())
                    .unwrap_or(false);
                logs.push(self.log(
                    CrossDomainAuthCompleted {
                        did: did_hash,
                        sourceDomain: auth._sourceDomain,
                        targetDomain: auth._targetDomain,
                        authorized,
                    }
                    .encode_log_data(),
                ));
            }
            return Ok((true, CROSS_DOMAIN_AUTH_GAS, logs));
        }
        Ok((false, REVERT_GAS.min(call.gas_limit), Vec::new()))
    }

    fn log(&self, data: alloy::primitives::LogData) -> Log {
        Log { address: self.contract, data }
    }
}

#[async_trait]
impl LedgerRpc for InMemoryLedger {
    async fn chain_id(&self) -> Result<u64, IdentityError> {
        self.ensure_reachable()?;
        Ok(self.chain_id)
    }

    async fn balance(&self, account: Address) -> Result<U256, IdentityError> {
        self.ensure_reachable()?;
        Ok(self.state.lock().balances.get(&account).copied().unwrap_or(U256::ZERO))
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, IdentityError> {
        self.ensure_reachable()?;
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(IdentityError::query("eth_call", "simulated node failure"));
        }
        if to != self.contract {
            return Ok(Bytes::new());
        }
        let query = devicesCall::abi_decode(&input, true)?;
        let state = self.state.lock();
        let encoded = match state.devices.get(&query._0) {
            Some(record) => devicesCall::abi_encode_returns(&(
                record.did.clone(),
                record.metadata.clone(),
                record.status,
                record.owner,
                record.registered_at,
                record.last_updated,
                record.exists,
            )),
            None => devicesCall::abi_encode_returns(&(String::new(), String::new(), 0u8, Address::ZERO, U256::ZERO, U256::ZERO, false)),
        };
        Ok(Bytes::from(encoded))
    }

    async fn send_transaction(&self, call: ContractCall) -> Result<TxHash, IdentityError> {
        self.ensure_reachable()?;
        if self.reject_for_gas.load(Ordering::SeqCst) {
            return Err(IdentityError::GasExhausted {
                gas_limit: call.gas_limit,
                details: format!("gas required exceeds allowance ({})", call.gas_limit),
            });
        }

        let mut state = self.state.lock();
        let nonce = state.submitted.len() as u64;
        let mut preimage = nonce.to_be_bytes().to_vec();
        preimage.extend_from_slice(call.from.as_slice());
        preimage.extend_from_slice(&call.input);
        let tx_hash: TxHash = keccak256(&preimage);

        let (status, gas_used, mut logs) = self.execute(&mut state, &call)?;
        if self.foreign_logs.load(Ordering::SeqCst) {
            logs.push(Log::new_unchecked(Address::repeat_byte(0xee), vec![B256::repeat_byte(0x01)], Bytes::new()));
        }
        state.block_number += 1;
        let receipt = LedgerReceipt { tx_hash, block_number: state.block_number, gas_used, status, logs };
        debug!("in-memory ledger executed tx_hash={} status={} gas_used={} block={}", tx_hash, status, gas_used, receipt.block_number);

        if self.hold_confirmations.load(Ordering::SeqCst) {
            state.held.push(receipt);
        } else {
            state.receipts.insert(tx_hash, receipt);
        }
        state.submitted.push(call);
        Ok(tx_hash)
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<LedgerReceipt>, IdentityError> {
        self.ensure_reachable()?;
        let receipt = self.state.lock().receipts.get(&tx_hash).cloned();
        trace!("in-memory receipt lookup tx_hash={} found={}", tx_hash, receipt.is_some());
        Ok(receipt)
    }
}

/// Connector handing out a shared [`InMemoryLedger`].
///
/// `wallet_accounts` stands in for what an external wallet would expose.
pub struct InMemoryConnector {
    ledger: Arc<InMemoryLedger>,
    wallet_accounts: Vec<Address>,
    opens: AtomicUsize,
}

impl InMemoryConnector {
    pub fn new(ledger: Arc<InMemoryLedger>) -> Self {
        Self { ledger, wallet_accounts: Vec::new(), opens: AtomicUsize::new(0) }
    }

    pub fn with_wallet_accounts(mut self, accounts: Vec<Address>) -> Self {
        self.wallet_accounts = accounts;
        self
    }

    pub fn ledger(&self) -> Arc<InMemoryLedger> {
        self.ledger.clone()
    }

    /// Number of times a provider was opened; zero means no network call was attempted.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerConnector for InMemoryConnector {
    async fn open(&self, params: &ConnectParams) -> Result<OpenedLedger, IdentityError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let account = match &params.signer {
            SignerMode::LocalKey(signer) => signer.address(),
            SignerMode::ExternalWallet { endpoint: None } => {
                return Err(IdentityError::ProviderUnavailable("no wallet endpoint configured".to_string()))
            }
            SignerMode::ExternalWallet { endpoint: Some(_) } => self
                .wallet_accounts
                .first()
                .copied()
                .ok_or_else(|| IdentityError::ProviderUnavailable("wallet exposes no accounts".to_string()))?,
        };
        let rpc: Arc<dyn LedgerRpc> = self.ledger.clone();
        Ok(OpenedLedger { rpc, account })
    }
}
