use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ConfigError,
    ProviderUnavailable,
    NetworkError,
    QueryError,
    NotConnected,
    GasExhausted,
    TransactionReverted,
    ConfirmationTimeout,
    ConfirmationCancelled,
    ConfirmationFailed,
    SubmissionCancelled,
    InvalidDeviceRecord,
    OracleRequestFailed,
    OracleUnreachable,
    GatewayRequestFailed,
    Unauthorized,
    SerializationError,
    EncodingError,
    InvalidInput,
    Message,
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    // === Session Errors ===
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("signer provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("not connected to the ledger; call connect first")]
    NotConnected,

    // === Transaction Errors ===
    #[error("gas exhausted: limit={gas_limit} ({details})")]
    GasExhausted { gas_limit: u64, details: String },

    #[error("transaction reverted tx_hash={tx_hash}")]
    TransactionReverted { tx_hash: String },

    #[error("confirmation wait timed out after {timeout_ms}ms tx_hash={tx_hash}")]
    ConfirmationTimeout { tx_hash: String, timeout_ms: u64 },

    #[error("confirmation wait cancelled tx_hash={tx_hash}")]
    ConfirmationCancelled { tx_hash: String },

    /// Receipt lookup failed after broadcast; look the hash up instead of resubmitting.
    #[error("confirmation failed tx_hash={tx_hash}: {details}")]
    ConfirmationFailed { tx_hash: String, details: String },

    /// Cancelled before anything was broadcast.
    #[error("{operation} cancelled before submission")]
    SubmissionCancelled { operation: String },

    // === Query Errors ===
    #[error("query error during {operation}: {details}")]
    QueryError { operation: String, details: String },

    #[error("invalid device record did={did}: {details}")]
    InvalidDeviceRecord { did: String, details: String },

    // === HTTP Collaborators ===
    /// Non-success response from the oracle service. `message` is the user-facing diagnostic.
    #[error("{message}")]
    OracleRequestFailed { status: u16, url: String, message: String },

    /// The oracle could not be reached at all (connection refused, DNS, ...).
    #[error("cannot connect to the oracle service (port {port}) at {url}; make sure the service is running: {details}")]
    OracleUnreachable { url: String, port: u16, details: String },

    #[error("gateway request failed status={status} url={url}: {message}")]
    GatewayRequestFailed { status: u16, url: String, message: String },

    #[error("unauthorized: session token rejected by {url}")]
    Unauthorized { url: String },

    // === Encoding ===
    #[error("{format} serialization error: {details}")]
    SerializationError { format: String, details: String },

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, IdentityError>;

impl IdentityError {
    pub fn code(&self) -> ErrorCode {
        match self {
            IdentityError::ConfigError(_) => ErrorCode::ConfigError,
            IdentityError::ProviderUnavailable(_) => ErrorCode::ProviderUnavailable,
            IdentityError::NetworkError(_) => ErrorCode::NetworkError,
            IdentityError::NotConnected => ErrorCode::NotConnected,
            IdentityError::GasExhausted { .. } => ErrorCode::GasExhausted,
            IdentityError::TransactionReverted { .. } => ErrorCode::TransactionReverted,
            IdentityError::ConfirmationTimeout { .. } => ErrorCode::ConfirmationTimeout,
            IdentityError::ConfirmationCancelled { .. } => ErrorCode::ConfirmationCancelled,
            IdentityError::ConfirmationFailed { .. } => ErrorCode::ConfirmationFailed,
            IdentityError::SubmissionCancelled { .. } => ErrorCode::SubmissionCancelled,
            IdentityError::QueryError { .. } => ErrorCode::QueryError,
            IdentityError::InvalidDeviceRecord { .. } => ErrorCode::InvalidDeviceRecord,
            IdentityError::OracleRequestFailed { .. } => ErrorCode::OracleRequestFailed,
            IdentityError::OracleUnreachable { .. } => ErrorCode::OracleUnreachable,
            IdentityError::GatewayRequestFailed { .. } => ErrorCode::GatewayRequestFailed,
            IdentityError::Unauthorized { .. } => ErrorCode::Unauthorized,
            IdentityError::SerializationError { .. } => ErrorCode::SerializationError,
            IdentityError::EncodingError(_) => ErrorCode::EncodingError,
            IdentityError::InvalidInput(_) => ErrorCode::InvalidInput,
            IdentityError::Message(_) => ErrorCode::Message,
        }
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext { code: self.code(), message: self.to_string() }
    }

    /// HTTP status carried by oracle/gateway failures.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            IdentityError::OracleRequestFailed { status, .. } | IdentityError::GatewayRequestFailed { status, .. } => Some(*status),
            IdentityError::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// Whether a caller may reasonably retry the same operation unchanged.
    ///
    /// Nothing in this crate retries on its own. Errors that carry a tx hash mean the
    /// transaction was broadcast; `ConfirmationTimeout` is retried by looking the hash up.
    pub fn is_retryable(&self) -> bool {
        match self {
            IdentityError::NetworkError(_)
            | IdentityError::QueryError { .. }
            | IdentityError::OracleUnreachable { .. }
            | IdentityError::ConfirmationTimeout { .. } => true,
            IdentityError::OracleRequestFailed { status, .. } | IdentityError::GatewayRequestFailed { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn query(operation: impl Into<String>, details: impl ToString) -> Self {
        IdentityError::QueryError { operation: operation.into(), details: details.to_string() }
    }

    pub fn config(details: impl Into<String>) -> Self {
        IdentityError::ConfigError(details.into())
    }
}

impl From<serde_json::Error> for IdentityError {
    fn from(err: serde_json::Error) -> Self {
        IdentityError::SerializationError { format: "json".to_string(), details: err.to_string() }
    }
}

impl From<alloy::sol_types::Error> for IdentityError {
    fn from(err: alloy::sol_types::Error) -> Self {
        IdentityError::SerializationError { format: "abi".to_string(), details: err.to_string() }
    }
}

#[macro_export]
macro_rules! serde_err {
    ($fmt:expr, $err:expr) => {
        $crate::foundation::IdentityError::SerializationError { format: $fmt.into(), details: $err.to_string() }
    };
}

// NOTE: Avoid adding generic "stringly" error conversions here.
// Use structured `IdentityError` variants at the call site to preserve context.
