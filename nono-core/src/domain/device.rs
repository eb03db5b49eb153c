use crate::foundation::IdentityError;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a device, shared by the contract (`uint8`) and the oracle (lowercase string).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    #[default]
    Active,
    Suspicious,
    Revoked,
}

impl DeviceStatus {
    pub fn as_u8(self) -> u8 {
        match self {
            DeviceStatus::Active => 0,
            DeviceStatus::Suspicious => 1,
            DeviceStatus::Revoked => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceStatus::Active => "active",
            DeviceStatus::Suspicious => "suspicious",
            DeviceStatus::Revoked => "revoked",
        }
    }
}

impl TryFrom<u8> for DeviceStatus {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(DeviceStatus::Active),
            1 => Ok(DeviceStatus::Suspicious),
            2 => Ok(DeviceStatus::Revoked),
            other => Err(other),
        }
    }
}

impl FromStr for DeviceStatus {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(DeviceStatus::Active),
            "suspicious" => Ok(DeviceStatus::Suspicious),
            "revoked" => Ok(DeviceStatus::Revoked),
            other => Err(IdentityError::InvalidInput(format!("unknown device status: {other}"))),
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On-chain device record as returned by `devices(did)`.
///
/// `exists == false` is the contract's "no such device" sentinel; the remaining
/// fields are zero values in that case and carry no meaning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub did: String,
    pub metadata: String,
    pub status: DeviceStatus,
    pub owner: Address,
    pub registered_at: u64,
    pub last_updated: u64,
    pub exists: bool,
}

/// Raw `devices(did)` tuple after ABI decoding, before normalization.
#[derive(Clone, Debug)]
pub struct RawDeviceRecord {
    pub did: String,
    pub metadata: String,
    pub status: u8,
    pub owner: Address,
    pub registered_at: alloy::primitives::U256,
    pub last_updated: alloy::primitives::U256,
    pub exists: bool,
}

impl DeviceRecord {
    pub fn absent(did: &str) -> Self {
        Self {
            did: did.to_string(),
            metadata: String::new(),
            status: DeviceStatus::Active,
            owner: Address::ZERO,
            registered_at: 0,
            last_updated: 0,
            exists: false,
        }
    }

    /// Normalize the raw tuple. `queried_did` is the key used for the lookup and is
    /// kept as the record's did when the device does not exist (the contract returns "").
    pub fn normalize(queried_did: &str, raw: RawDeviceRecord) -> Result<Self, IdentityError> {
        if !raw.exists {
            return Ok(Self::absent(queried_did));
        }
        let status = DeviceStatus::try_from(raw.status).map_err(|value| IdentityError::InvalidDeviceRecord {
            did: queried_did.to_string(),
            details: format!("status out of range: {value}"),
        })?;
        Ok(Self {
            did: raw.did,
            metadata: raw.metadata,
            status,
            owner: raw.owner,
            registered_at: raw.registered_at.saturating_to::<u64>(),
            last_updated: raw.last_updated.saturating_to::<u64>(),
            exists: true,
        })
    }

    /// Parsed metadata, when it is valid JSON.
    pub fn metadata_json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.metadata).ok()
    }
}

/// Result of a device lookup that keeps "absent" and "query failed" apart.
#[derive(Debug)]
pub enum DevicePresence {
    Exists(DeviceRecord),
    Absent,
    QueryFailed(IdentityError),
}

impl DevicePresence {
    pub fn exists(&self) -> bool {
        matches!(self, DevicePresence::Exists(_))
    }

    pub fn record(&self) -> Option<&DeviceRecord> {
        match self {
            DevicePresence::Exists(record) => Some(record),
            _ => None,
        }
    }
}

impl From<Result<DeviceRecord, IdentityError>> for DevicePresence {
    fn from(result: Result<DeviceRecord, IdentityError>) -> Self {
        match result {
            Ok(record) if record.exists => DevicePresence::Exists(record),
            Ok(_) => DevicePresence::Absent,
            Err(err) => DevicePresence::QueryFailed(err),
        }
    }
}
