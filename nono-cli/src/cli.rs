use alloy::primitives::TxHash;
use clap::{Args, Parser, Subcommand};
use nono_core::domain::DeviceStatus;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nono")]
#[command(about = "Device identity and cross-domain authorization client", long_about = None)]
pub struct Cli {
    /// Path to configuration file (default: $NONO_CONFIG_PATH or ./nono.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filters, e.g. `debug` or `info,alloy_transport=debug` (overrides logging.level)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Write rolling log files into this directory (overrides logging.log_dir)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect and print account, network, contract and balance
    Info,
    /// Register a device on the registry contract
    Register(RegisterArgs),
    /// Request cross-domain authorization for a device
    Auth(AuthArgs),
    /// Read the on-chain device record
    Device { did: String },
    /// Print whether a device exists on chain
    Exists { did: String },
    /// Look up and decode a submitted transaction
    Receipt { tx_hash: TxHash },
    /// Query the device status oracle
    #[command(subcommand)]
    Oracle(OracleCommand),
    /// Query the backend gateway (uses gateway.token)
    #[command(subcommand)]
    Gateway(GatewayCommand),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Info => "info",
            Command::Register(_) => "register",
            Command::Auth(_) => "auth",
            Command::Device { .. } => "device",
            Command::Exists { .. } => "exists",
            Command::Receipt { .. } => "receipt",
            Command::Oracle(_) => "oracle",
            Command::Gateway(_) => "gateway",
        }
    }
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    pub did: String,

    /// Device metadata JSON (stored as `{}` when empty)
    #[arg(short, long, default_value = "")]
    pub metadata: String,

    /// Confirmation timeout in seconds (overrides ledger.confirmation_timeout_secs)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Args, Debug)]
pub struct AuthArgs {
    pub did: String,
    pub source_domain: String,
    pub target_domain: String,

    /// Compare the outcome with the on-chain record and the oracle consensus
    #[arg(long)]
    pub cross_check: bool,

    /// Confirmation timeout in seconds (overrides ledger.confirmation_timeout_secs)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum OracleCommand {
    Health,
    Status,
    Datasources,
    Device { did: String },
    Devices,
    Consensus { did: String },
    Config,
}

#[derive(Subcommand, Debug)]
pub enum GatewayCommand {
    Device {
        did: String,
    },
    Devices {
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        status: Option<DeviceStatus>,
    },
    Records {
        did: String,
    },
    Logs {
        #[arg(long)]
        did: Option<String>,
        #[arg(long)]
        domain: Option<String>,
    },
    Verify {
        tx_hash: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
