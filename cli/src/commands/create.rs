use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, Result};
use safe_creation::{
    ChainClient, CreationAttempt, CreationStatus, Error, GatewayClient, PendingCreation,
    RpcClient, SafeCreator, SafeSession,
};

use crate::cli::CreateArgs;
use crate::commands::{ctrl_c_token, finish, load_config, parse_params, select_version};
use crate::output::{confirm_prompt, print_status, CreationOutput};
use crate::wallet::{create_signer, signing_provider};

pub async fn run(args: CreateArgs, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path, args.gateway_url.as_deref())?;
    let version = select_version(args.safe.safe_version.as_deref(), &config)?;

    let signer = create_signer(&args.wallet)?;
    let signer_address = signer.address();
    let params = parse_params(&args.safe, Some(signer_address))?;

    let client = RpcClient::new(signing_provider(&args.rpc_url, signer)?, signer_address);
    let session = SafeSession::connect(client, config.registry()?, version).await?;
    let gateway = GatewayClient::new(config.gateway.clone())?;

    let creator = SafeCreator::new(&session, &gateway)
        .with_watcher(config.watcher())
        .with_backoff(config.indexer.clone())
        .with_cancel(ctrl_c_token());

    let mut attempt = creator.prepare(params).await?;
    if !json {
        println!("Safe Address: {}", attempt.safe_address());
        println!("  Chain ID: {}", attempt.chain_id());
        println!("  Version: {}", version);
        println!();
    }

    if !session.client().code_at(attempt.safe_address()).await?.is_empty() {
        if !json {
            println!("Safe already deployed at {}", attempt.safe_address());
        }
        output(&attempt, None, true).print(json);
        return Ok(());
    }
    print_status(attempt.status(), json);

    if !args.no_confirm && !json && !confirm_prompt("Deploy new Safe?") {
        let status = creator.reject(&mut attempt)?;
        print_status(status, json);
        output(&attempt, None, false).print(json);
        return Ok(());
    }

    match creator.submit(&mut attempt).await {
        Ok(status) => print_status(status, json),
        // interrupted mid-broadcast: the tx may be out, keep it resumable
        Err(Error::Cancelled) => {
            return match save_pending(attempt.pending(), &args.pending_dir, json)? {
                Some(path) => Err(eyre!(
                    "Interrupted after submission; continue with `resume --pending {}`",
                    path.display()
                )),
                None => Err(eyre!("Interrupted before submission")),
            };
        }
        Err(e) => return Err(e.into()),
    }
    if attempt.status() != CreationStatus::Processing {
        output(&attempt, None, false).print(json);
        return Ok(());
    }

    // persist before waiting so an interrupted run can be resumed
    let pending_file = save_pending(attempt.pending(), &args.pending_dir, json)?
        .ok_or_else(|| eyre!("Submitted attempt has no transaction"))?;

    finish(&creator, &mut attempt, args.skip_indexer, json).await?;

    let keep = attempt.status() == CreationStatus::Timeout;
    if !keep {
        std::fs::remove_file(&pending_file)?;
    }
    output(&attempt, keep.then_some(pending_file), false).print(json);

    Ok(())
}

/// Writes the pending record, if the attempt has one, into `dir`
fn save_pending(record: Option<&PendingCreation>, dir: &Path, json: bool) -> Result<Option<PathBuf>> {
    let Some(record) = record else {
        return Ok(None);
    };
    let path = dir.join(record.file_name());
    record.save(&path)?;
    if !json {
        println!("Tx Hash: {}", record.tx_hash);
        println!("Saved pending creation to {}", path.display());
    }
    Ok(Some(path))
}

pub(crate) fn output(
    attempt: &CreationAttempt,
    pending_file: Option<PathBuf>,
    already_deployed: bool,
) -> CreationOutput {
    CreationOutput {
        safe_address: attempt.safe_address(),
        chain_id: attempt.chain_id(),
        status: (!already_deployed).then(|| attempt.status()),
        tx_hash: attempt.tx_hash(),
        replaced_by: attempt.replacement(),
        pending_file,
        owners: attempt.params().owners().to_vec(),
        threshold: attempt.params().threshold(),
        already_deployed,
    }
}
