pub mod coordinator;
pub mod devices;
pub mod session;
pub mod transactions;

pub use coordinator::AuthorizationCoordinator;
pub use devices::DeviceReader;
pub use session::{LedgerSession, SessionHandles, SessionInfo};
pub use transactions::{SubmitOptions, TransactionClient};
