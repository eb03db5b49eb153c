use crate::foundation::{IdentityError, LOCAL_NETWORK_NAME, MAX_DID_LENGTH, MAX_DOMAIN_LENGTH};
use crate::foundation::util::url::is_dot_segment;
use serde::{Deserialize, Serialize};

/// Resolved ledger network identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub chain_id: u64,
    pub name: String,
}

impl NetworkInfo {
    pub fn from_chain_id(chain_id: u64) -> Self {
        Self { chain_id, name: network_name(chain_id).to_string() }
    }
}

/// Human-readable name for well-known chain ids.
pub fn network_name(chain_id: u64) -> &'static str {
    match chain_id {
        1 => "mainnet",
        11_155_111 => "sepolia",
        17_000 => "holesky",
        1337 | 5777 | 31_337 => LOCAL_NETWORK_NAME,
        _ => "unknown",
    }
}

pub fn validate_did(did: &str) -> Result<&str, IdentityError> {
    if did.trim().is_empty() {
        return Err(IdentityError::InvalidInput("did is empty".to_string()));
    }
    if did.len() > MAX_DID_LENGTH {
        return Err(IdentityError::InvalidInput(format!("did too long: {} > {}", did.len(), MAX_DID_LENGTH)));
    }
    if is_dot_segment(did) {
        return Err(IdentityError::InvalidInput(format!("did {did:?} is not a valid identifier")));
    }
    Ok(did)
}

pub fn validate_domain<'a>(field: &str, domain: &'a str) -> Result<&'a str, IdentityError> {
    if domain.trim().is_empty() {
        return Err(IdentityError::InvalidInput(format!("{field} is empty")));
    }
    if domain.len() > MAX_DOMAIN_LENGTH {
        return Err(IdentityError::InvalidInput(format!("{field} too long: {} > {}", domain.len(), MAX_DOMAIN_LENGTH)));
    }
    Ok(domain)
}
