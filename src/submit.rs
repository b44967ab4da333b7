//! Creation transaction submission

use alloy::primitives::TxHash;
use tracing::{debug, info};

use crate::client::{ChainClient, TxRequest};
use crate::encoding::encode_safe_creation_tx;
use crate::error::Result;
use crate::session::SafeSession;
use crate::types::{PendingCreationTx, SafeCreationParams};

/// Result of a successful broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub tx_hash: TxHash,
    /// Snapshot the caller persists to resume waiting later
    pub pending: PendingCreationTx,
}

/// Encodes the creation tx and captures the sender nonce and current block.
///
/// The nonce and start block are what the confirmation watcher needs to spot a
/// replacement after a reload.
pub async fn build_pending_creation_tx<C: ChainClient>(
    session: &SafeSession<C>,
    params: &SafeCreationParams,
) -> Result<PendingCreationTx> {
    let tx = encode_safe_creation_tx(
        params,
        session.registry(),
        session.chain_id(),
        session.version(),
    )?;
    let from = session.account();
    let client = session.client();

    Ok(PendingCreationTx {
        data: tx.data,
        from,
        nonce: client.transaction_count(from).await?,
        to: tx.to,
        value: tx.value,
        start_block: client.block_number().await?,
    })
}

/// Estimates gas for the creation tx sent from the session account
pub async fn estimate_creation_gas<C: ChainClient>(
    session: &SafeSession<C>,
    params: &SafeCreationParams,
) -> Result<u64> {
    let tx = encode_safe_creation_tx(
        params,
        session.registry(),
        session.chain_id(),
        session.version(),
    )?;
    let gas = session
        .client()
        .estimate_gas(&TxRequest {
            from: session.account(),
            to: tx.to,
            data: tx.data,
            value: tx.value,
            nonce: None,
        })
        .await?;

    debug!(chain_id = session.chain_id(), gas, "estimated safe creation gas");
    Ok(gas)
}

/// Broadcasts a captured creation tx through the session wallet.
///
/// Errors are [`Error::WalletRejected`](crate::Error::WalletRejected) when the
/// user declines to sign and
/// [`Error::SubmissionFailed`](crate::Error::SubmissionFailed) otherwise.
pub async fn send_pending_creation_tx<C: ChainClient>(
    session: &SafeSession<C>,
    pending: &PendingCreationTx,
) -> Result<TxHash> {
    session
        .client()
        .send_transaction(TxRequest {
            from: pending.from,
            to: pending.to,
            data: pending.data.clone(),
            value: pending.value,
            nonce: Some(pending.nonce),
        })
        .await
}

/// Captures and broadcasts the creation tx for `params`
pub async fn submit_creation_tx<C: ChainClient>(
    session: &SafeSession<C>,
    params: &SafeCreationParams,
) -> Result<Submission> {
    let pending = build_pending_creation_tx(session, params).await?;
    let tx_hash = send_pending_creation_tx(session, &pending).await?;

    info!(
        chain_id = session.chain_id(),
        tx_hash = %tx_hash,
        nonce = pending.nonce,
        start_block = pending.start_block,
        "safe creation transaction submitted"
    );

    Ok(Submission { tx_hash, pending })
}
