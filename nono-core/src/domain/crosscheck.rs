use crate::domain::device::DeviceStatus;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Conflict {
    /// Ledger granted access while the oracle consensus does not consider the device active.
    AuthorizedButFlagged { oracle_status: DeviceStatus },
    /// The on-chain status and the oracle consensus status disagree.
    StatusDrift { ledger_status: DeviceStatus, oracle_status: DeviceStatus },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "details", rename_all = "snake_case")]
pub enum Verdict {
    Consistent,
    Conflicting(Vec<Conflict>),
    Indeterminate(String),
}

impl Verdict {
    pub fn is_consistent(&self) -> bool {
        matches!(self, Verdict::Consistent)
    }
}

/// Ledger outcome and oracle consensus for one DID, side by side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CrossCheck {
    pub did: String,
    pub ledger_authorized: Option<bool>,
    pub ledger_status: Option<DeviceStatus>,
    pub oracle_status: Option<DeviceStatus>,
    pub oracle_consensus_reached: bool,
    pub verdict: Verdict,
}

/// Inputs gathered from both backends. `oracle_error` is set when the oracle could not
/// answer at all.
#[derive(Clone, Debug, Default)]
pub struct CrossCheckInputs {
    pub ledger_authorized: Option<bool>,
    pub ledger_status: Option<DeviceStatus>,
    pub oracle_status: Option<DeviceStatus>,
    pub oracle_consensus_reached: bool,
    pub oracle_error: Option<String>,
}

pub fn reconcile(did: &str, inputs: CrossCheckInputs) -> CrossCheck {
    let verdict = verdict_for(&inputs);
    CrossCheck {
        did: did.to_string(),
        ledger_authorized: inputs.ledger_authorized,
        ledger_status: inputs.ledger_status,
        oracle_status: inputs.oracle_status,
        oracle_consensus_reached: inputs.oracle_consensus_reached,
        verdict,
    }
}

fn verdict_for(inputs: &CrossCheckInputs) -> Verdict {
    if let Some(err) = &inputs.oracle_error {
        return Verdict::Indeterminate(format!("oracle unavailable: {err}"));
    }
    if !inputs.oracle_consensus_reached {
        return Verdict::Indeterminate("oracle consensus not reached".to_string());
    }
    let Some(oracle_status) = inputs.oracle_status else {
        return Verdict::Indeterminate("oracle reported no consensus status".to_string());
    };

    let mut conflicts = Vec::new();
    if inputs.ledger_authorized == Some(true) && oracle_status != DeviceStatus::Active {
        conflicts.push(Conflict::AuthorizedButFlagged { oracle_status });
    }
    if let Some(ledger_status) = inputs.ledger_status {
        if ledger_status != oracle_status {
            conflicts.push(Conflict::StatusDrift { ledger_status, oracle_status });
        }
    }
    if conflicts.is_empty() {
        Verdict::Consistent
    } else {
        Verdict::Conflicting(conflicts)
    }
}
