//! Wallet/provider boundary
//!
//! [`ChainClient`] is the full set of chain capabilities the creation flow
//! uses. [`RpcClient`] implements it over an alloy provider whose filler
//! stack carries the signing wallet.

use std::future::Future;

use alloy::consensus::Transaction as ConsensusTransaction;
use alloy::eips::BlockNumberOrTag;
use alloy::network::primitives::ReceiptResponse;
use alloy::network::{AnyNetwork, TransactionBuilder, TransactionResponse};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::Provider;
use alloy::transports::{RpcError, TransportErrorKind};
use tracing::debug;

use crate::error::{Error, Result};

/// EIP-1193 "user rejected request" code
pub const USER_REJECTED_CODE: i64 = 4001;

/// Transaction to sign and broadcast, or to estimate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    /// Explicit nonce; filled by the wallet when `None`
    pub nonce: Option<u64>,
}

/// The parts of a receipt the creation flow inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// `status == 1`
    pub success: bool,
}

/// A mined transaction as seen in a block body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTx {
    pub hash: TxHash,
    pub from: Address,
    pub nonce: u64,
    pub to: Option<Address>,
    pub value: U256,
    pub input: Bytes,
}

/// Chain capabilities required by the creation flow.
///
/// `send_transaction` must report a refused signature as
/// [`Error::WalletRejected`] and every other broadcast failure as
/// [`Error::SubmissionFailed`].
pub trait ChainClient: Send + Sync {
    /// Chain ID of the connected network
    fn chain_id(&self) -> impl Future<Output = Result<u64>> + Send;

    /// Account the wallet signs with (account index 0)
    fn account(&self) -> Address;

    /// `eth_getTransactionCount` at the latest block
    fn transaction_count(&self, address: Address) -> impl Future<Output = Result<u64>> + Send;

    /// Current block number
    fn block_number(&self) -> impl Future<Output = Result<u64>> + Send;

    /// `eth_call` against the latest block
    fn call(&self, to: Address, data: Bytes) -> impl Future<Output = Result<Bytes>> + Send;

    /// Deployed bytecode at `address`
    fn code_at(&self, address: Address) -> impl Future<Output = Result<Bytes>> + Send;

    /// Gas estimate for `tx`
    fn estimate_gas(&self, tx: &TxRequest) -> impl Future<Output = Result<u64>> + Send;

    /// Signs and broadcasts `tx`, returning its hash
    fn send_transaction(&self, tx: TxRequest) -> impl Future<Output = Result<TxHash>> + Send;

    /// Receipt for `hash`, if mined
    fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> impl Future<Output = Result<Option<TxReceipt>>> + Send;

    /// Transactions included in block `number`
    fn block_transactions(&self, number: u64)
        -> impl Future<Output = Result<Vec<ChainTx>>> + Send;
}

/// Returns true if an error message reads like a refused signature
pub fn is_wallet_rejection(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    ["user rejected", "user denied", "rejected by user", "action_rejected", "user cancelled"]
        .iter()
        .any(|needle| message.contains(needle))
}

/// Maps a broadcast failure to [`Error::WalletRejected`] or [`Error::SubmissionFailed`]
pub fn classify_send_error(err: RpcError<TransportErrorKind>) -> Error {
    if let Some(payload) = err.as_error_resp() {
        if payload.code == USER_REJECTED_CODE || is_wallet_rejection(&payload.message) {
            return Error::WalletRejected(payload.message.to_string());
        }
    }
    let message = err.to_string();
    if is_wallet_rejection(&message) {
        Error::WalletRejected(message)
    } else {
        Error::SubmissionFailed(message)
    }
}

/// [`ChainClient`] over an alloy provider.
///
/// The provider must be able to sign for `account`, e.g. one built with
/// `ProviderBuilder::new().wallet(..)`.
#[derive(Debug, Clone)]
pub struct RpcClient<P> {
    provider: P,
    account: Address,
}

impl<P> RpcClient<P> {
    pub fn new(provider: P, account: Address) -> Self {
        Self { provider, account }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P> RpcClient<P>
where
    P: Provider<AnyNetwork>,
{
    fn build_request(tx: &TxRequest) -> <AnyNetwork as alloy::network::Network>::TransactionRequest {
        let request = <AnyNetwork as alloy::network::Network>::TransactionRequest::default()
            .with_from(tx.from)
            .with_to(tx.to)
            .with_value(tx.value)
            .with_input(tx.data.clone());
        match tx.nonce {
            Some(nonce) => request.with_nonce(nonce),
            None => request,
        }
    }
}

impl<P> ChainClient for RpcClient<P>
where
    P: Provider<AnyNetwork> + Send + Sync,
{
    async fn chain_id(&self) -> Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }

    fn account(&self) -> Address {
        self.account
    }

    async fn transaction_count(&self, address: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(|e| Error::Fetch {
                what: "transaction count",
                reason: e.to_string(),
            })
    }

    async fn block_number(&self) -> Result<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| Error::Fetch {
                what: "block number",
                reason: e.to_string(),
            })
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let request = <AnyNetwork as alloy::network::Network>::TransactionRequest::default()
            .with_to(to)
            .with_input(data);
        Ok(self.provider.call(request).await?)
    }

    async fn code_at(&self, address: Address) -> Result<Bytes> {
        Ok(self.provider.get_code_at(address).await?)
    }

    async fn estimate_gas(&self, tx: &TxRequest) -> Result<u64> {
        self.provider
            .estimate_gas(Self::build_request(tx))
            .await
            .map_err(|e| Error::GasEstimation(e.to_string()))
    }

    async fn send_transaction(&self, tx: TxRequest) -> Result<TxHash> {
        let pending = self
            .provider
            .send_transaction(Self::build_request(&tx))
            .await
            .map_err(classify_send_error)?;
        let hash = *pending.tx_hash();
        debug!(tx_hash = %hash, from = %tx.from, to = %tx.to, "transaction broadcast");
        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| Error::Fetch {
                what: "transaction receipt",
                reason: e.to_string(),
            })?;

        Ok(receipt.map(|r| TxReceipt {
            tx_hash: r.transaction_hash(),
            block_number: r.block_number(),
            success: r.status(),
        }))
    }

    async fn block_transactions(&self, number: u64) -> Result<Vec<ChainTx>> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .full()
            .await
            .map_err(|e| Error::Fetch {
                what: "block",
                reason: e.to_string(),
            })?;

        let Some(block) = block else {
            return Ok(Vec::new());
        };

        Ok(block
            .transactions
            .txns()
            .map(|tx| ChainTx {
                hash: TransactionResponse::tx_hash(tx),
                from: TransactionResponse::from(tx),
                nonce: ConsensusTransaction::nonce(tx),
                to: ConsensusTransaction::to(tx),
                value: ConsensusTransaction::value(tx),
                input: ConsensusTransaction::input(tx).clone(),
            })
            .collect())
    }
}
