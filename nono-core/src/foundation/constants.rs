//! Client-wide constants for the nono identity client.

/// Gas ceiling applied to every contract submission unless configured otherwise.
pub const DEFAULT_GAS_LIMIT: u64 = 200_000;

/// Default ledger JSON-RPC endpoint (local Ganache/Anvil).
pub const DEFAULT_LEDGER_RPC_URL: &str = "http://127.0.0.1:8545";

/// Default oracle service base URL (the oracle mounts its API under `/api/v1`).
pub const DEFAULT_ORACLE_BASE_URL: &str = "http://127.0.0.1:9000/api/v1";

/// Default backend gateway base URL.
pub const DEFAULT_GATEWAY_BASE_URL: &str = "http://127.0.0.1:8080/api/v1";

/// Request timeout for oracle and gateway calls (10 seconds).
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Interval between `eth_getTransactionReceipt` polls while awaiting confirmation.
pub const DEFAULT_RECEIPT_POLL_INTERVAL_MS: u64 = 500;

/// Metadata used when a device is registered without any.
pub const DEFAULT_DEVICE_METADATA: &str = "{}";

/// Port assumed for the oracle when its base URL does not carry one.
pub const DEFAULT_ORACLE_PORT: u16 = 9000;

/// Network name reported for development chains (Ganache, Anvil, Hardhat).
pub const LOCAL_NETWORK_NAME: &str = "Local Network";

/// Maximum accepted length of a DID string.
pub const MAX_DID_LENGTH: usize = 256;

/// Maximum accepted length of a domain name.
pub const MAX_DOMAIN_LENGTH: usize = 128;

/// Chain id used by local development nodes and the in-memory ledger.
pub const LOCAL_CHAIN_ID: u64 = 31337;
