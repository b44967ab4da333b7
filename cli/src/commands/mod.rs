pub mod collectibles;
pub mod create;
pub mod info;
pub mod predict;
pub mod resume;

use std::path::Path;

use alloy::network::AnyNetwork;
use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use color_eyre::eyre::{eyre, Result};
use safe_creation::{
    cancel_pair, CancelToken, CreationAttempt, CreationConfig, CreationStatus, Error,
    GatewayClient, RpcClient, SafeCreationParams, SafeCreator, SafeSession, SafeVersion,
};
use tokio::sync::mpsc;

use crate::cli::SafeArgs;
use crate::output::{print_poll_event, print_status};

pub type CliSession = SafeSession<RpcClient<DynProvider<AnyNetwork>>>;
pub type CliCreator<'s> = SafeCreator<'s, RpcClient<DynProvider<AnyNetwork>>, GatewayClient>;

/// Loads the config file (or defaults) and applies the gateway URL flag
pub fn load_config(path: Option<&Path>, gateway_url: Option<&str>) -> Result<CreationConfig> {
    let mut config = match path {
        Some(path) => CreationConfig::from_toml(path)?,
        None => {
            let mut config = CreationConfig::default();
            config.apply_overrides(|name| std::env::var(name).ok());
            config
        }
    };
    if let Some(url) = gateway_url {
        url::Url::parse(url).map_err(|e| eyre!("Invalid gateway URL '{}': {}", url, e))?;
        config.gateway.base_url = url.to_string();
    }
    config.validate()?;
    Ok(config)
}

/// Version from the flag, falling back to the configured one
pub fn select_version(flag: Option<&str>, config: &CreationConfig) -> Result<SafeVersion> {
    match flag {
        Some(version) => Ok(version.parse()?),
        None => Ok(config.safe_version),
    }
}

/// Builds creation params; `signer` (if any) becomes the first owner
pub fn parse_params(args: &SafeArgs, signer: Option<Address>) -> Result<SafeCreationParams> {
    let mut owners: Vec<Address> = signer.into_iter().collect();
    for owner_str in &args.owners {
        let owner: Address = owner_str
            .parse()
            .map_err(|e| eyre!("Invalid owner address '{}': {}", owner_str, e))?;
        if !owners.contains(&owner) {
            owners.push(owner);
        }
    }

    let salt_nonce: U256 = args
        .salt_nonce
        .parse()
        .map_err(|e| eyre!("Invalid salt nonce '{}': {}", args.salt_nonce, e))?;

    Ok(SafeCreationParams::new(owners, args.threshold, salt_nonce)?)
}

/// Cancel token that fires on Ctrl-C
pub fn ctrl_c_token() -> CancelToken {
    let (handle, token) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping");
            handle.cancel();
        }
    });
    token
}

/// Waits for the submitted tx and, unless skipped, for the gateway to index the Safe
pub async fn finish(
    creator: &CliCreator<'_>,
    attempt: &mut CreationAttempt,
    skip_indexer: bool,
    json: bool,
) -> Result<()> {
    if !json {
        println!("Waiting for transaction...");
    }
    match creator.confirm(attempt).await {
        Ok(status) => print_status(status, json),
        Err(Error::Cancelled) => return Err(eyre!("Interrupted; resume later with the pending file")),
        Err(e) => return Err(e.into()),
    }

    if skip_indexer || attempt.status() != CreationStatus::Success {
        return Ok(());
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let drain = async {
        while let Some(event) = rx.recv().await {
            print_poll_event(&event, json);
        }
    };
    let (result, ()) = tokio::join!(creator.await_indexed(attempt, Some(tx)), drain);

    match result {
        Ok(_) => print_status(CreationStatus::Indexed, json),
        Err(Error::IndexerTimeout { .. }) => {
            if !json {
                println!("Safe deployed but not yet visible on the gateway");
            }
        }
        Err(Error::Cancelled) => return Err(eyre!("Interrupted while waiting for the gateway")),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
