#![allow(dead_code)]

use crate::fixtures::{contract, LedgerConfigBuilder};
use nono_core::application::{LedgerSession, SubmitOptions, TransactionClient};
use nono_core::infrastructure::ledger::{InMemoryConnector, InMemoryLedger};
use std::sync::Arc;
use std::time::Duration;

/// Session wired to an in-memory ledger.
pub struct LedgerHarness {
    pub ledger: Arc<InMemoryLedger>,
    pub connector: Arc<InMemoryConnector>,
    pub session: Arc<LedgerSession>,
}

impl LedgerHarness {
    pub fn new() -> Self {
        Self::with_connector(|ledger| InMemoryConnector::new(ledger))
    }

    pub fn with_connector(build: impl FnOnce(Arc<InMemoryLedger>) -> InMemoryConnector) -> Self {
        let ledger = Arc::new(InMemoryLedger::new(contract()));
        let connector = Arc::new(build(ledger.clone()));
        let session = Arc::new(LedgerSession::new(connector.clone()));
        Self { ledger, connector, session }
    }

    pub async fn connected() -> Self {
        let harness = Self::new();
        harness.session.connect(&LedgerConfigBuilder::default().build()).await.expect("connect");
        harness
    }

    pub fn transactions(&self, options: SubmitOptions) -> TransactionClient {
        TransactionClient::new(self.session.clone(), options)
    }
}

pub fn fast_submit_options() -> SubmitOptions {
    SubmitOptions { poll_interval: Duration::from_millis(5), ..SubmitOptions::default() }
}
