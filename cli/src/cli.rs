use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "safe-create")]
#[command(about = "Predict, deploy and track new Safe accounts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// TOML configuration file
    #[arg(long, global = true, env = "SAFE_CREATION_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the counterfactual address of a new Safe
    Predict(PredictArgs),

    /// Deploy a new Safe and follow it until it is indexed
    Create(CreateArgs),

    /// Resume waiting for a previously submitted creation
    Resume(ResumeArgs),

    /// Display a Safe as seen by the client gateway
    Info(GatewayArgs),

    /// List the collectibles held by a Safe
    Collectibles(GatewayArgs),
}

/// Parameters of the Safe to create
#[derive(Parser, Clone)]
pub struct SafeArgs {
    /// Owner address (repeatable; the signer, if any, is always included)
    #[arg(long = "owner", value_name = "ADDR")]
    pub owners: Vec<String>,

    /// Signature threshold
    #[arg(long, default_value = "1")]
    pub threshold: u64,

    /// Salt nonce for CREATE2
    #[arg(long, default_value = "0")]
    pub salt_nonce: String,

    /// Safe version (defaults to the configured version)
    #[arg(long)]
    pub safe_version: Option<String>,
}

#[derive(Parser, Clone)]
pub struct PredictArgs {
    /// RPC endpoint URL
    #[arg(long, env = "ETH_RPC_URL")]
    pub rpc_url: String,

    #[command(flatten)]
    pub safe: SafeArgs,

    #[command(flatten)]
    pub wallet: WalletArgs,
}

#[derive(Parser, Clone)]
pub struct CreateArgs {
    /// RPC endpoint URL
    #[arg(long, env = "ETH_RPC_URL")]
    pub rpc_url: String,

    #[command(flatten)]
    pub safe: SafeArgs,

    /// Directory pending creations are written to
    #[arg(long, default_value = ".safe-creation")]
    pub pending_dir: PathBuf,

    /// Stop after on-chain confirmation
    #[arg(long)]
    pub skip_indexer: bool,

    /// Client gateway base URL
    #[arg(long, env = "SAFE_GATEWAY_URL")]
    pub gateway_url: Option<String>,

    /// Skip confirmation prompt
    #[arg(long)]
    pub no_confirm: bool,

    #[command(flatten)]
    pub wallet: WalletArgs,
}

#[derive(Parser, Clone)]
pub struct ResumeArgs {
    /// RPC endpoint URL
    #[arg(long, env = "ETH_RPC_URL")]
    pub rpc_url: String,

    /// Pending creation file written by `create`
    #[arg(long)]
    pub pending: PathBuf,

    /// Stop after on-chain confirmation
    #[arg(long)]
    pub skip_indexer: bool,

    /// Client gateway base URL
    #[arg(long, env = "SAFE_GATEWAY_URL")]
    pub gateway_url: Option<String>,
}

#[derive(Parser, Clone)]
pub struct GatewayArgs {
    /// Chain ID the Safe lives on
    #[arg(long)]
    pub chain_id: u64,

    /// Safe contract address
    #[arg(long, env = "SAFE_ADDRESS")]
    pub safe: String,

    /// Client gateway base URL
    #[arg(long, env = "SAFE_GATEWAY_URL")]
    pub gateway_url: Option<String>,
}

#[derive(Parser, Clone)]
pub struct WalletArgs {
    /// Raw private key
    #[arg(long, env = "PRIVATE_KEY")]
    pub private_key: Option<String>,

    /// Prompt for private key interactively
    #[arg(short, long)]
    pub interactive: bool,
}

impl WalletArgs {
    pub fn is_set(&self) -> bool {
        self.interactive || self.private_key.is_some()
    }
}
