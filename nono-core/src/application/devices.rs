use crate::application::session::LedgerSession;
use crate::domain::abi::IDeviceRegistry::devicesCall;
use crate::domain::{DevicePresence, DeviceRecord, RawDeviceRecord};
use crate::foundation::{validate_did, IdentityError};
use alloy::sol_types::SolCall;
use log::{debug, trace};
use std::sync::Arc;

/// Read-only access to the contract's `devices(did)` mapping.
pub struct DeviceReader {
    session: Arc<LedgerSession>,
}

impl DeviceReader {
    pub fn new(session: Arc<LedgerSession>) -> Self {
        Self { session }
    }

    /// Fetch and normalize the record for `did`. A missing device is `exists == false`, not an error.
    pub async fn get_device(&self, did: &str) -> Result<DeviceRecord, IdentityError> {
        let handles = self.session.handles()?;
        let did = validate_did(did)?;
        let input = devicesCall { _0: did.to_string() }.abi_encode();
        let output = handles.rpc.call(handles.contract, input.into()).await.map_err(|err| match err {
            IdentityError::NetworkError(details) => IdentityError::query("devices", details),
            other => other,
        })?;
        let raw = devicesCall::abi_decode_returns(&output, true)
            .map_err(|err| IdentityError::query("devices", format!("undecodable response ({} bytes): {err}", output.len())))?;
        let record = DeviceRecord::normalize(
            did,
            RawDeviceRecord {
                did: raw.did,
                metadata: raw.metadata,
                status: raw.status,
                owner: raw.owner,
                registered_at: raw.registeredAt,
                last_updated: raw.lastUpdated,
                exists: raw.exists,
            },
        )?;
        trace!("device read did={} exists={} status={}", did, record.exists, record.status);
        Ok(record)
    }

    /// `true` only for an existing device; every failure reads as `false`.
    pub async fn check_device_exists(&self, did: &str) -> bool {
        match self.get_device(did).await {
            Ok(record) => record.exists,
            Err(err) => {
                debug!("device existence check failed did={} error={}", did, err);
                false
            }
        }
    }

    /// Like [`check_device_exists`](Self::check_device_exists) but keeps query failures apart from absence.
    pub async fn device_presence(&self, did: &str) -> DevicePresence {
        self.get_device(did).await.into()
    }
}
