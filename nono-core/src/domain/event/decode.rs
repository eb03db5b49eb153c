use crate::domain::abi::IDeviceRegistry::{CrossDomainAuthCompleted, CrossDomainAuthRequested, DeviceRegistered};
use crate::domain::event::types::{DecodedLogs, DomainEvent};
use alloy::primitives::Log;
use alloy::sol_types::SolEvent;
use log::trace;

/// Decode receipt logs into domain events.
///
/// Logs with unknown signatures or undecodable data are counted in `skipped`
/// rather than reported as errors. Decoded events keep the emitting address.
pub fn decode_logs(logs: &[Log]) -> DecodedLogs {
    let mut decoded = DecodedLogs::default();
    for (index, log) in logs.iter().enumerate() {
        match decode_log(log) {
            Some(event) => decoded.events.push(event),
            None => {
                trace!("event decode skipped log_index={} address={} topics={}", index, log.address, log.topics().len());
                decoded.skipped += 1;
            }
        }
    }
    decoded
}

pub fn decode_log(log: &Log) -> Option<DomainEvent> {
    let topic0 = *log.topics().first()?;
    let contract = log.address;
    if topic0 == DeviceRegistered::SIGNATURE_HASH {
        let event = DeviceRegistered::decode_log_data(&log.data, true).ok()?;
        return Some(DomainEvent::DeviceRegistered {
            contract,
            did_hash: event.did,
            owner: event.owner,
            timestamp: event.timestamp.saturating_to::<u64>(),
        });
    }
    if topic0 == CrossDomainAuthRequested::SIGNATURE_HASH {
        let event = CrossDomainAuthRequested::decode_log_data(&log.data, true).ok()?;
        return Some(DomainEvent::CrossDomainAuthRequested {
            contract,
            did_hash: event.did,
            source_domain: event.sourceDomain,
            target_domain: event.targetDomain,
        });
    }
    if topic0 == CrossDomainAuthCompleted::SIGNATURE_HASH {
        let event = CrossDomainAuthCompleted::decode_log_data(&log.data, true).ok()?;
        return Some(DomainEvent::CrossDomainAuthCompleted {
            contract,
            did_hash: event.did,
            source_domain: event.sourceDomain,
            target_domain: event.targetDomain,
            authorized: event.authorized,
        });
    }
    None
}

/// Authorization outcome carried by the first `CrossDomainAuthCompleted` event, if any.
pub fn authorized_from_events(events: &[DomainEvent]) -> Option<bool> {
    events.iter().find_map(|event| match event {
        DomainEvent::CrossDomainAuthCompleted { authorized, .. } => Some(*authorized),
        _ => None,
    })
}
