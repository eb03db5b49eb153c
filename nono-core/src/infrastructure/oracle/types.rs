use crate::domain::DeviceStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One data source's observation of a device, or the consensus pick among them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OracleDeviceStatus {
    pub did: String,
    /// `"active"`, `"suspicious"` or `"revoked"`; kept as text so unknown values still decode.
    pub status: String,
    #[serde(default)]
    pub online: bool,
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: String,
    #[serde(default)]
    pub source: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl OracleDeviceStatus {
    pub fn device_status(&self) -> Option<DeviceStatus> {
        self.status.parse().ok()
    }
}

/// Voting breakdown for one device as served by `/consensus/{did}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsensusStatus {
    #[serde(rename = "device_did")]
    pub did: String,
    #[serde(default)]
    pub total_votes: u32,
    #[serde(default, rename = "vote_details")]
    pub votes: BTreeMap<String, u32>,
    #[serde(default, rename = "consensus")]
    pub consensus_reached: bool,
    #[serde(default)]
    pub consensus_status: Option<OracleDeviceStatus>,
    #[serde(default)]
    pub min_consensus: u32,
    #[serde(default, rename = "all_statuses")]
    pub statuses: Vec<OracleDeviceStatus>,
}

impl ConsensusStatus {
    /// Consensus status, only when consensus was reached and the value is known.
    pub fn status(&self) -> Option<DeviceStatus> {
        if !self.consensus_reached {
            return None;
        }
        self.consensus_status.as_ref().and_then(OracleDeviceStatus::device_status)
    }

    /// Share of votes backing the consensus status, in `0.0..=1.0`.
    pub fn trust_value(&self) -> f64 {
        let Some(winner) = self.consensus_status.as_ref().filter(|_| self.consensus_reached) else {
            return 0.0;
        };
        if self.total_votes == 0 {
            return 0.0;
        }
        f64::from(self.votes.get(&winner.status).copied().unwrap_or(0)) / f64::from(self.total_votes)
    }

    /// Distinct data sources that contributed a vote, in first-seen order.
    pub fn data_source_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for status in &self.statuses {
            if !status.source.is_empty() && !ids.contains(&status.source.as_str()) {
                ids.push(status.source.as_str());
            }
        }
        ids
    }

    /// Latest observation time across all votes.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.statuses.iter().filter_map(|status| status.timestamp).max()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleHealth {
    pub status: String,
    #[serde(default)]
    pub data_sources: u32,
    #[serde(default)]
    pub blockchain: bool,
}

impl OracleHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceHealth {
    pub name: String,
    #[serde(default)]
    pub healthy: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleStatus {
    pub status: String,
    #[serde(default)]
    pub data_sources: u32,
    #[serde(default)]
    pub data_sources_detail: Vec<DataSourceHealth>,
    #[serde(default)]
    pub blockchain: bool,
    #[serde(default)]
    pub interval: u64,
    #[serde(default)]
    pub min_consensus: u32,
    #[serde(default)]
    pub voting_nodes: u32,
}

/// Non-secret view of the oracle's configuration served by `/config`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfigView {
    #[serde(default)]
    pub oracle: OracleVotingConfig,
    #[serde(default)]
    pub blockchain: OracleLedgerConfig,
    #[serde(default)]
    pub data_sources: OracleDataSources,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleVotingConfig {
    #[serde(default)]
    pub interval: u64,
    #[serde(default)]
    pub voting_nodes: u32,
    #[serde(default)]
    pub min_consensus: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleLedgerConfig {
    #[serde(default)]
    pub rpc_url: String,
    #[serde(default)]
    pub chain_id: u64,
    #[serde(default)]
    pub contract_addr: String,
    #[serde(default)]
    pub configured: bool,
    #[serde(default)]
    pub private_key_configured: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleDataSources {
    #[serde(default)]
    pub configured: Vec<ConfiguredDataSource>,
    #[serde(default)]
    pub loaded: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredDataSource {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub api_key_configured: bool,
}
