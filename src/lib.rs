//! # safe-creation
//!
//! Counterfactual creation of Safe smart accounts: predict the address,
//! submit the proxy-factory transaction, follow it to a terminal status and
//! wait for the Safe to show up on the client gateway.
//!
//! ## Features
//!
//! - CREATE2 address prediction from owners, threshold and salt nonce
//! - Pure `setup` + `createProxyWithNonce` encoding against a contract registry
//! - Confirmation watching with a hard timeout and replacement detection
//! - Bounded exponential backoff while the gateway indexes the new Safe
//! - A status state machine where every failure maps to one user-facing status
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use safe_creation::{
//!     ContractRegistry, GatewayClient, GatewayConfig, RpcClient, SafeCreationParams,
//!     SafeCreator, SafeSession, SafeVersion,
//! };
//!
//! let client = RpcClient::new(provider, signer_address);
//! let session = SafeSession::connect(client, ContractRegistry::with_defaults(), SafeVersion::V1_3_0).await?;
//! let gateway = GatewayClient::new(GatewayConfig::default())?;
//!
//! let params = SafeCreationParams::new(vec![owner_a, owner_b], 2, U256::ZERO)?;
//! let creator = SafeCreator::new(&session, &gateway);
//!
//! let mut attempt = creator.run(params, |_| true).await?;
//! if attempt.status() == CreationStatus::Success {
//!     let info = creator.await_indexed(&mut attempt, None).await?;
//!     println!("Safe {} indexed with nonce {}", attempt.safe_address(), info.nonce);
//! }
//! ```
//!
//! ## Resuming
//!
//! Persist [`CreationAttempt::pending`] right after submission. After a
//! restart, [`PendingCreation::load`] and [`SafeCreator::resume`] pick the wait
//! back up without re-submitting.

pub mod cancel;
pub mod chain;
pub mod client;
pub mod config;
pub mod contracts;
pub mod create2;
pub mod encoding;
pub mod error;
pub mod indexer;
pub mod lifecycle;
pub mod session;
pub mod submit;
pub mod types;
pub mod watch;

// Re-export main types at crate root
pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use chain::{
    is_legacy_version, is_valid_safe_version, ChainAddresses, ChainDeployment, ContractRegistry,
    ContractRole, SafeVersion,
};
pub use client::{ChainClient, ChainTx, RpcClient, TxReceipt, TxRequest};
pub use config::CreationConfig;
pub use contracts::{ISafeProxyFactory, ISafeSetup};
pub use create2::{compute_create2_address, predict_safe_address};
pub use encoding::{encode_safe_creation_tx, encode_setup_call, SafeCreationTx};
pub use error::{Error, Result};
pub use indexer::{
    BackoffPolicy, GatewayClient, GatewayConfig, IndexerPoller, PollEvent, PollTask,
    SafeCollectible, SafeIndexer, SafeInfo,
};
pub use lifecycle::{
    classify_confirmation, classify_submission_error, CreationAttempt, CreationTracker,
    FailureKind, SafeCreator,
};
pub use session::{SafeSession, SessionSlot};
pub use submit::{estimate_creation_gas, submit_creation_tx, Submission};
pub use types::{CreationStatus, PendingCreation, PendingCreationTx, SafeCreationParams};
pub use watch::{ConfirmationWatcher, ReplacementReason, WatchOutcome};

// Re-export alloy types that are commonly used
pub use alloy::network::AnyNetwork;
pub use alloy::primitives::{Address, Bytes, TxHash, U256};
