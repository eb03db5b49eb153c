use super::print_json;
use crate::cli::OracleCommand;
use nono_core::foundation::IdentityError;
use nono_core::infrastructure::config::AppConfig;
use nono_core::infrastructure::oracle::OracleClient;

pub async fn run(app_config: &AppConfig, command: OracleCommand) -> Result<(), IdentityError> {
    let client = OracleClient::new(&app_config.oracle)?;
    match command {
        OracleCommand::Health => print_json(&client.health().await?),
        OracleCommand::Status => print_json(&client.status().await?),
        OracleCommand::Datasources => print_json(&client.data_sources().await?),
        OracleCommand::Device { did } => print_json(&client.device_status(&did).await?),
        OracleCommand::Devices => print_json(&client.all_device_statuses().await?),
        OracleCommand::Consensus { did } => {
            let consensus = client.consensus_status(&did).await?;
            print_json(&serde_json::json!({
                "consensus": consensus,
                "status": consensus.status(),
                "trust_value": consensus.trust_value(),
                "data_sources": consensus.data_source_ids(),
                "timestamp": consensus.timestamp(),
            }))
        }
        OracleCommand::Config => print_json(&client.config().await?),
    }
}
