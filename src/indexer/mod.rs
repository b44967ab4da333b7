//! Indexer access and post-deployment polling
//!
//! After on-chain success a new Safe is not immediately visible to the
//! off-chain indexer. [`IndexerPoller`] retries [`SafeIndexer::fetch_safe`]
//! with bounded exponential backoff until the record appears.

mod gateway;
mod poller;

use std::future::Future;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

pub use gateway::{GatewayClient, GatewayConfig, DEFAULT_GATEWAY_URL};
pub use poller::{BackoffPolicy, IndexerPoller, PollEvent, PollTask};

use crate::error::Result;

/// An address with optional display metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInfo {
    pub value: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
}

/// Indexed Safe record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeInfo {
    pub address: AddressInfo,
    pub chain_id: String,
    pub nonce: u64,
    pub threshold: u64,
    pub owners: Vec<AddressInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<AddressInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_handler: Option<AddressInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<AddressInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<AddressInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// An NFT held by a Safe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeCollectible {
    pub address: Address,
    pub token_name: String,
    pub token_symbol: String,
    pub id: String,
    #[serde(default)]
    pub logo_uri: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_uri: Option<String>,
}

/// Read access to the off-chain Safe index.
///
/// `fetch_safe` returns `Ok(None)` while the Safe is unknown to the index.
pub trait SafeIndexer: Send + Sync {
    fn fetch_safe(
        &self,
        chain_id: u64,
        address: Address,
    ) -> impl Future<Output = Result<Option<SafeInfo>>> + Send;

    fn fetch_collectibles(
        &self,
        chain_id: u64,
        address: Address,
    ) -> impl Future<Output = Result<Vec<SafeCollectible>>> + Send;
}
