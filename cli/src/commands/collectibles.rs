use std::path::Path;

use alloy::primitives::Address;
use color_eyre::eyre::Result;
use safe_creation::{GatewayClient, SafeIndexer};

use crate::cli::GatewayArgs;
use crate::commands::load_config;
use crate::output::CollectiblesOutput;

pub async fn run(args: GatewayArgs, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path, args.gateway_url.as_deref())?;
    let gateway = GatewayClient::new(config.gateway)?;

    let safe: Address = args.safe.parse()?;
    let collectibles = gateway.fetch_collectibles(args.chain_id, safe).await?;

    CollectiblesOutput {
        safe,
        chain_id: args.chain_id,
        collectibles,
    }
    .print(json);

    Ok(())
}
