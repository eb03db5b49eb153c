//! Logging constants for the nono client.

pub const LOG_FILE_NAME: &str = "nono.log";
/// Warn+error only.
pub const ERR_LOG_FILE_NAME: &str = "nono_err.log";

/// Format: `timestamp [LEVEL] message [module]`
pub const LOG_LINE_PATTERN_COLORED: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{h({l:5})}] {m} [{M}]{n}";
pub const LOG_LINE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l:5}] {m} [{M}]{n}";

/// Rotate at 50 MB.
pub const LOG_FILE_MAX_SIZE: u64 = 50_000_000;
pub const LOG_FILE_MAX_ROLLS: u32 = 5;

/// Crates logged at the requested app level; everything else is off unless `root=<level>` is given.
pub const WHITELISTED_CRATES: &[&str] = &["nono_core", "nono"];
