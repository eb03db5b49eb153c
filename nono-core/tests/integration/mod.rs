mod coordinator_flow;
mod gateway_client;
mod ledger_session;
mod oracle_client;
