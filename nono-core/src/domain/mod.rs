pub mod abi;
pub mod crosscheck;
pub mod device;
pub mod event;
pub mod receipt;
pub mod results;

pub use crosscheck::{reconcile, Conflict, CrossCheck, CrossCheckInputs, Verdict};
pub use device::{DevicePresence, DeviceRecord, DeviceStatus, RawDeviceRecord};
pub use event::{authorized_from_events, decode_logs, DecodedLogs, DomainEvent};
pub use receipt::LedgerReceipt;
pub use results::{AuthorizationResult, TransactionResult};
