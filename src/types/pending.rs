//! Snapshot of a submitted creation transaction, persisted for resumption

use std::path::Path;

use alloy::primitives::{Address, Bytes, TxHash, U256};
use serde::{Deserialize, Serialize};

use super::SafeCreationParams;
use crate::chain::SafeVersion;
use crate::error::{Error, Result};

/// Everything needed to keep waiting for a creation transaction after a restart.
///
/// Captured at submission time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCreationTx {
    /// `createProxyWithNonce` calldata
    pub data: Bytes,
    /// Account that signed the transaction
    pub from: Address,
    /// Account nonce the transaction was sent with
    pub nonce: u64,
    /// Proxy factory
    pub to: Address,
    /// Always zero
    pub value: U256,
    /// Block number observed right before submission
    pub start_block: u64,
}

/// A submitted creation attempt as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCreation {
    pub chain_id: u64,
    /// Safe release the creation tx was encoded for
    pub version: SafeVersion,
    /// Predicted Safe address; keys the attempt
    pub safe_address: Address,
    pub tx_hash: TxHash,
    pub params: SafeCreationParams,
    pub tx: PendingCreationTx,
}

impl PendingCreation {
    /// Writes the record as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::Persistence(e.to_string()))?;
        }
        let json =
            serde_json::to_string_pretty(self).map_err(|e| Error::Persistence(e.to_string()))?;
        std::fs::write(path, json)
            .map_err(|e| Error::Persistence(format!("{}: {}", path.display(), e)))
    }

    /// Reads a record written by [`save`](Self::save)
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Persistence(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw).map_err(|e| Error::Persistence(e.to_string()))
    }

    /// Conventional file name for a pending creation
    pub fn file_name(&self) -> String {
        format!("{}-{}.json", self.chain_id, self.safe_address)
    }
}
