//! Safe client gateway over HTTP

use std::time::Duration;

use alloy::primitives::Address;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{SafeCollectible, SafeIndexer, SafeInfo};
use crate::error::{Error, Result};

pub const DEFAULT_GATEWAY_URL: &str = "https://safe-client.safe.global";

/// Gateway endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    /// Total per-request timeout
    pub timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GATEWAY_URL.to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::InvalidConfig("gateway.base_url is empty".to_string()));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::InvalidConfig(format!("gateway.base_url: {e}")))?;
        Ok(())
    }
}

/// Async client for the Safe client gateway
#[derive(Debug, Clone)]
pub struct GatewayClient {
    cfg: GatewayConfig,
    client: Client,
}

impl GatewayClient {
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        cfg.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| Error::Gateway(format!("failed to build http client: {e}")))?;
        Ok(Self { cfg, client })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.cfg
    }

    fn safe_url(&self, chain_id: u64, address: Address) -> String {
        let base = self.cfg.base_url.trim_end_matches('/');
        format!("{base}/v1/chains/{chain_id}/safes/{}", address.to_checksum(None))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        debug!(%url, "gateway request");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::Gateway(format!("{url} returned HTTP {}", status.as_u16())));
        }
        Ok(Some(resp.json().await?))
    }
}

impl SafeIndexer for GatewayClient {
    async fn fetch_safe(&self, chain_id: u64, address: Address) -> Result<Option<SafeInfo>> {
        self.get_json(&self.safe_url(chain_id, address)).await
    }

    async fn fetch_collectibles(
        &self,
        chain_id: u64,
        address: Address,
    ) -> Result<Vec<SafeCollectible>> {
        let url = format!(
            "{}/collectibles?trusted=false&exclude_spam=true",
            self.safe_url(chain_id, address)
        );
        Ok(self.get_json(&url).await?.unwrap_or_default())
    }
}
