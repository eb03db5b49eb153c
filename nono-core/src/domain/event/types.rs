use alloy::primitives::{keccak256, Address, B256};
use serde::Serialize;

/// Contract event decoded from a receipt log.
///
/// `did` is an indexed string in the contract ABI, so logs only carry its keccak256
/// hash. Use [`DomainEvent::concerns`] to match an event against a known DID.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "PascalCase")]
pub enum DomainEvent {
    DeviceRegistered { contract: Address, did_hash: B256, owner: Address, timestamp: u64 },
    CrossDomainAuthRequested { contract: Address, did_hash: B256, source_domain: String, target_domain: String },
    CrossDomainAuthCompleted { contract: Address, did_hash: B256, source_domain: String, target_domain: String, authorized: bool },
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::DeviceRegistered { .. } => "DeviceRegistered",
            DomainEvent::CrossDomainAuthRequested { .. } => "CrossDomainAuthRequested",
            DomainEvent::CrossDomainAuthCompleted { .. } => "CrossDomainAuthCompleted",
        }
    }

    pub fn contract(&self) -> Address {
        match self {
            DomainEvent::DeviceRegistered { contract, .. }
            | DomainEvent::CrossDomainAuthRequested { contract, .. }
            | DomainEvent::CrossDomainAuthCompleted { contract, .. } => *contract,
        }
    }

    pub fn did_hash(&self) -> B256 {
        match self {
            DomainEvent::DeviceRegistered { did_hash, .. }
            | DomainEvent::CrossDomainAuthRequested { did_hash, .. }
            | DomainEvent::CrossDomainAuthCompleted { did_hash, .. } => *did_hash,
        }
    }

    pub fn concerns(&self, did: &str) -> bool {
        self.did_hash() == did_topic(did)
    }
}

/// Topic value the contract emits for an indexed `string did`.
pub fn did_topic(did: &str) -> B256 {
    keccak256(did.as_bytes())
}

/// Events decoded from one receipt, in log order, plus the number of log entries
/// that matched none of the known event schemas.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DecodedLogs {
    pub events: Vec<DomainEvent>,
    pub skipped: usize,
}

impl DecodedLogs {
    pub fn events_for<'a>(&'a self, did: &'a str) -> impl Iterator<Item = &'a DomainEvent> + 'a {
        let topic = did_topic(did);
        self.events.iter().filter(move |event| event.did_hash() == topic)
    }
}
