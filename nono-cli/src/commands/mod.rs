mod gateway;
mod ledger;
mod oracle;

use crate::cli::Command;
use nono_core::foundation::IdentityError;
use nono_core::infrastructure::config::AppConfig;
use serde::Serialize;

pub async fn run(command: Command, app_config: &AppConfig) -> Result<(), IdentityError> {
    match command {
        Command::Info => ledger::info(app_config).await,
        Command::Register(args) => ledger::register(app_config, args).await,
        Command::Auth(args) => ledger::auth(app_config, args).await,
        Command::Device { did } => ledger::device(app_config, &did).await,
        Command::Exists { did } => ledger::exists(app_config, &did).await,
        Command::Receipt { tx_hash } => ledger::receipt(app_config, tx_hash).await,
        Command::Oracle(command) => oracle::run(app_config, command).await,
        Command::Gateway(command) => gateway::run(app_config, command).await,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), IdentityError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
