use super::print_json;
use crate::cli::GatewayCommand;
use log::warn;
use nono_core::foundation::IdentityError;
use nono_core::infrastructure::config::AppConfig;
use nono_core::infrastructure::gateway::{AuthLogFilter, DeviceFilter, GatewayClient};

pub async fn run(app_config: &AppConfig, command: GatewayCommand) -> Result<(), IdentityError> {
    let client = GatewayClient::new(&app_config.gateway)?;
    if !client.has_token() {
        warn!("gateway.token is not set; protected endpoints will answer 401");
    }
    match command {
        GatewayCommand::Device { did } => print_json(&client.get_device(&did).await?),
        GatewayCommand::Devices { domain, status } => print_json(&client.list_devices(&DeviceFilter { domain, status }).await?),
        GatewayCommand::Records { did } => print_json(&client.auth_records(&did).await?),
        GatewayCommand::Logs { did, domain } => {
            print_json(&client.auth_logs(&AuthLogFilter { device_did: did, domain }).await?)
        }
        GatewayCommand::Verify { tx_hash } => print_json(&client.verify_transaction(&tx_hash).await?),
    }
}
