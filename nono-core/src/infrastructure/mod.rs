pub mod config;
pub mod gateway;
pub(crate) mod http;
pub mod ledger;
pub mod logging;
pub mod oracle;
