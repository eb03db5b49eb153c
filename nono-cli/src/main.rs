mod cli;
mod commands;
mod setup;

use crate::cli::Cli;
use log::{debug, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse_args();
    let app_config = setup::load_app_config(args.config.as_deref())?;
    setup::init_logging(&args, &app_config)?;
    setup::validate_startup_config(&app_config)?;
    debug!(
        "config loaded rpc_url={} oracle={} gateway={} external_wallet={}",
        nono_core::foundation::util::url::redact_url(&app_config.ledger.rpc_url),
        app_config.oracle.base_url,
        app_config.gateway.base_url,
        app_config.ledger.use_external_wallet
    );

    let command_name = args.command.name();
    info!("nono command starting command={}", command_name);
    commands::run(args.command, &app_config).await?;
    debug!("nono command finished command={}", command_name);
    Ok(())
}
