use std::path::Path;

use alloy::primitives::Address;
use color_eyre::eyre::{eyre, Result};
use safe_creation::{GatewayClient, SafeIndexer};

use crate::cli::GatewayArgs;
use crate::commands::load_config;
use crate::output::SafeInfoOutput;

pub async fn run(args: GatewayArgs, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path, args.gateway_url.as_deref())?;
    let gateway = GatewayClient::new(config.gateway)?;

    let safe_address: Address = args.safe.parse()?;

    let info = gateway
        .fetch_safe(args.chain_id, safe_address)
        .await?
        .ok_or_else(|| eyre!("Safe {} is not known on chain {}", safe_address, args.chain_id))?;

    SafeInfoOutput::from_info(args.chain_id, &info).print(json);

    Ok(())
}
