use std::path::Path;

use color_eyre::eyre::Result;
use safe_creation::{CreationStatus, GatewayClient, PendingCreation, RpcClient, SafeCreator, SafeSession};

use crate::cli::ResumeArgs;
use crate::commands::create::output;
use crate::commands::{ctrl_c_token, finish, load_config};
use crate::output::print_status;
use crate::wallet::read_provider;

pub async fn run(args: ResumeArgs, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path, args.gateway_url.as_deref())?;
    let record = PendingCreation::load(&args.pending)?;

    // nothing is signed on resume
    let client = RpcClient::new(read_provider(&args.rpc_url)?, record.tx.from);
    let session = SafeSession::connect(client, config.registry()?, record.version).await?;
    let gateway = GatewayClient::new(config.gateway.clone())?;

    let creator = SafeCreator::new(&session, &gateway)
        .with_watcher(config.watcher())
        .with_backoff(config.indexer.clone())
        .with_cancel(ctrl_c_token());

    if !json {
        println!("Resuming Safe {} (tx {})", record.safe_address, record.tx_hash);
    }
    let mut attempt = creator.resume(record)?;
    print_status(attempt.status(), json);

    finish(&creator, &mut attempt, args.skip_indexer, json).await?;

    let keep = attempt.status() == CreationStatus::Timeout;
    if !keep {
        std::fs::remove_file(&args.pending)?;
    }
    output(&attempt, keep.then_some(args.pending), false).print(json);

    Ok(())
}
