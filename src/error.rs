//! Error types for safe-creation

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

/// Result type alias for safe-creation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while predicting, submitting or tracking a Safe creation
#[derive(Debug, Error)]
pub enum Error {
    /// No wallet/provider session is attached
    #[error("No wallet provider attached")]
    NoProvider,

    /// Failed to talk to the RPC provider
    #[error("Provider error: {0}")]
    Provider(String),

    /// Failed to fetch data from the blockchain
    #[error("Failed to fetch {what}: {reason}")]
    Fetch { what: &'static str, reason: String },

    /// No contract deployments are known for the chain
    #[error("Unsupported chain ID: {0}")]
    UnsupportedChain(u64),

    /// The Safe version is not one of the supported releases
    #[error("Unsupported Safe version: {0}")]
    UnsupportedVersion(String),

    /// A contract role has no deployment for the chain/version pair
    #[error("No {role} deployment for chain {chain_id} (Safe {version})")]
    MissingContract {
        role: &'static str,
        chain_id: u64,
        version: String,
    },

    /// The creation parameters are invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Threshold is zero or exceeds the owner count
    #[error("Invalid threshold: {threshold} (must be 1-{owners})")]
    InvalidThreshold { threshold: u64, owners: usize },

    /// The same owner appears twice
    #[error("Duplicate owner: {0}")]
    DuplicateOwner(Address),

    /// The wallet refused to sign the creation transaction
    #[error("Wallet rejected the transaction: {0}")]
    WalletRejected(String),

    /// Broadcasting the creation transaction failed
    #[error("Failed to submit transaction: {0}")]
    SubmissionFailed(String),

    /// Waiting for the creation transaction did not resolve in time
    #[error("Transaction {tx_hash} not confirmed within {timeout_ms}ms")]
    ConfirmationTimeout { tx_hash: TxHash, timeout_ms: u64 },

    /// The gateway never returned the Safe record
    #[error("Safe {address} not indexed after {attempts} attempts")]
    IndexerTimeout { address: Address, attempts: u32 },

    /// Gateway transport or protocol error
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// A status transition out of a terminal state was attempted
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// The hosting context went away before a terminal state was reached
    #[error("Operation cancelled")]
    Cancelled,

    /// Reading or writing a persisted record failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Gas estimation failed
    #[error("Gas estimation failed: {0}")]
    GasEstimation(String),

    /// ABI encoding/decoding error
    #[error("ABI error: {0}")]
    Abi(String),
}

impl From<alloy::transports::RpcError<alloy::transports::TransportErrorKind>> for Error {
    fn from(err: alloy::transports::RpcError<alloy::transports::TransportErrorKind>) -> Self {
        Error::Provider(err.to_string())
    }
}

impl From<alloy::sol_types::Error> for Error {
    fn from(err: alloy::sol_types::Error) -> Self {
        Error::Abi(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Gateway(err.to_string())
    }
}
