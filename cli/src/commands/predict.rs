use alloy::primitives::Address;
use color_eyre::eyre::Result;
use safe_creation::{
    encode_safe_creation_tx, estimate_creation_gas, predict_safe_address, ChainClient, RpcClient,
    SafeSession,
};

use crate::cli::PredictArgs;
use crate::commands::{load_config, parse_params, select_version};
use crate::output::PredictionOutput;
use crate::wallet::{create_signer, read_provider, signing_provider};

pub async fn run(args: PredictArgs, config_path: Option<&std::path::Path>, json: bool) -> Result<()> {
    let config = load_config(config_path, None)?;
    let version = select_version(args.safe.safe_version.as_deref(), &config)?;

    // A wallet is optional; with one, the signer becomes an owner and gas is estimated
    let (provider, signer_address) = if args.wallet.is_set() {
        let signer = create_signer(&args.wallet)?;
        let address = signer.address();
        (signing_provider(&args.rpc_url, signer)?, Some(address))
    } else {
        (read_provider(&args.rpc_url)?, None)
    };

    let params = parse_params(&args.safe, signer_address)?;
    let client = RpcClient::new(provider, signer_address.unwrap_or(Address::ZERO));
    let session = SafeSession::connect(client, config.registry()?, version).await?;

    let safe_address = predict_safe_address(&session, &params).await?;
    let tx = encode_safe_creation_tx(&params, session.registry(), session.chain_id(), version)?;
    let already_deployed = !session.client().code_at(safe_address).await?.is_empty();

    let gas_estimate = if signer_address.is_some() && !already_deployed {
        Some(estimate_creation_gas(&session, &params).await?)
    } else {
        None
    };

    let output = PredictionOutput {
        safe_address,
        chain_id: session.chain_id(),
        safe_version: version.to_string(),
        factory: tx.to,
        singleton: tx.singleton,
        owners: params.owners().to_vec(),
        threshold: params.threshold(),
        salt_nonce: params.salt_nonce(),
        already_deployed,
        gas_estimate,
    };
    output.print(json);

    Ok(())
}
