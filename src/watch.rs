//! Confirmation watcher
//!
//! Waits for a creation transaction to be mined, bounded by a wall-clock
//! timeout. While the hash has no receipt, the sender's nonce is checked: once
//! it moves past the pending nonce, blocks from the captured start block are
//! scanned for the transaction that consumed it, which is then reported as a
//! replacement.

use std::fmt;
use std::time::Duration;

use alloy::primitives::{Bytes, TxHash};
use tracing::{debug, info, warn};

use crate::client::{ChainClient, ChainTx, TxReceipt};
use crate::error::{Error, Result};
use crate::types::PendingCreationTx;

/// Default wall-clock bound: 6.5 minutes
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_millis(390_000);

/// Default delay between receipt polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(4_000);

/// Why the pending nonce was consumed by a different transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementReason {
    /// Same call re-sent with a different gas price (speed-up)
    Repriced,
    /// Zero-value, empty self-transfer
    Cancelled,
    /// Anything else
    Replaced,
}

impl ReplacementReason {
    /// Compares the transaction that consumed the nonce against the original
    pub fn classify(original: &PendingCreationTx, replacement: &ChainTx) -> Self {
        if replacement.input == original.data
            && replacement.to == Some(original.to)
            && replacement.value == original.value
        {
            ReplacementReason::Repriced
        } else if replacement.input == Bytes::new()
            && replacement.to == Some(replacement.from)
            && replacement.value.is_zero()
        {
            ReplacementReason::Cancelled
        } else {
            ReplacementReason::Replaced
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReplacementReason::Repriced => "repriced",
            ReplacementReason::Cancelled => "cancelled",
            ReplacementReason::Replaced => "replaced",
        }
    }
}

impl fmt::Display for ReplacementReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a watched transaction resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The watched hash was mined; check `success` for a revert
    Mined(TxReceipt),
    /// Another transaction consumed the nonce
    Replaced {
        reason: ReplacementReason,
        replacement: TxHash,
        receipt: TxReceipt,
    },
}

/// Polls for a receipt with replacement detection and a hard timeout
#[derive(Debug, Clone)]
pub struct ConfirmationWatcher {
    timeout: Duration,
    poll_interval: Duration,
    confirmations: u64,
}

impl Default for ConfirmationWatcher {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            confirmations: 1,
        }
    }
}

impl ConfirmationWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Number of blocks (including the inclusion block) to wait for; at least 1
    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations.max(1);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Waits for `tx_hash` or its replacement.
    ///
    /// Fails only with [`Error::ConfirmationTimeout`] when the bound elapses.
    /// Failed RPC reads are logged and retried on the next poll.
    pub async fn wait<C: ChainClient>(
        &self,
        client: &C,
        tx_hash: TxHash,
        pending: &PendingCreationTx,
    ) -> Result<WatchOutcome> {
        tokio::time::timeout(self.timeout, self.poll_until_resolved(client, tx_hash, pending))
            .await
            .map_err(|_| Error::ConfirmationTimeout {
                tx_hash,
                timeout_ms: self.timeout.as_millis() as u64,
            })
    }

    async fn poll_until_resolved<C: ChainClient>(
        &self,
        client: &C,
        tx_hash: TxHash,
        pending: &PendingCreationTx,
    ) -> WatchOutcome {
        let mut next_scan_block = pending.start_block;

        loop {
            match self
                .poll_once(client, tx_hash, pending, &mut next_scan_block)
                .await
            {
                Ok(Some(outcome)) => return outcome,
                Ok(None) => {}
                Err(e) => warn!(
                    tx_hash = %tx_hash,
                    stage = "confirm",
                    error = %e,
                    "confirmation poll failed, retrying"
                ),
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// One receipt check plus, once the nonce moved, a scan for the replacement.
    ///
    /// `next_scan_block` only advances past blocks that were fully read.
    async fn poll_once<C: ChainClient>(
        &self,
        client: &C,
        tx_hash: TxHash,
        pending: &PendingCreationTx,
        next_scan_block: &mut u64,
    ) -> Result<Option<WatchOutcome>> {
        if let Some(receipt) = client.transaction_receipt(tx_hash).await? {
            if self.is_confirmed(client, &receipt).await? {
                debug!(tx_hash = %tx_hash, success = receipt.success, "transaction mined");
                return Ok(Some(WatchOutcome::Mined(receipt)));
            }
            return Ok(None);
        }
        if client.transaction_count(pending.from).await? <= pending.nonce {
            return Ok(None);
        }

        let head = client.block_number().await?;
        while *next_scan_block <= head {
            let txs = client.block_transactions(*next_scan_block).await?;
            let consumer = txs
                .into_iter()
                .find(|tx| tx.from == pending.from && tx.nonce == pending.nonce);

            match consumer {
                // our own hash; its receipt shows up on a later poll
                Some(tx) if tx.hash == tx_hash => return Ok(None),
                Some(tx) => {
                    let Some(receipt) = client.transaction_receipt(tx.hash).await? else {
                        return Ok(None);
                    };
                    if !self.is_confirmed(client, &receipt).await? {
                        return Ok(None);
                    }
                    let reason = ReplacementReason::classify(pending, &tx);
                    info!(
                        tx_hash = %tx_hash,
                        replacement = %tx.hash,
                        %reason,
                        "creation transaction replaced"
                    );
                    return Ok(Some(WatchOutcome::Replaced {
                        reason,
                        replacement: tx.hash,
                        receipt,
                    }));
                }
                None => *next_scan_block += 1,
            }
        }
        Ok(None)
    }

    async fn is_confirmed<C: ChainClient>(&self, client: &C, receipt: &TxReceipt) -> Result<bool> {
        let Some(mined_at) = receipt.block_number else {
            return Ok(false);
        };
        if self.confirmations <= 1 {
            return Ok(true);
        }
        let head = client.block_number().await?;
        Ok(head.saturating_sub(mined_at) + 1 >= self.confirmations)
    }
}
