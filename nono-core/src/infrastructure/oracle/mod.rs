pub mod client;
pub mod types;

pub use client::OracleClient;
pub use types::*;
