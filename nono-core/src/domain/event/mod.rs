pub mod decode;
pub mod types;

pub use decode::{authorized_from_events, decode_log, decode_logs};
pub use types::{did_topic, DecodedLogs, DomainEvent};
