//! Runtime configuration loaded from TOML with environment overrides

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chain::{ChainDeployment, ContractRegistry, SafeVersion};
use crate::error::{Error, Result};
use crate::indexer::{BackoffPolicy, GatewayConfig};
use crate::watch::ConfirmationWatcher;

/// Overrides `gateway.base_url`
pub const GATEWAY_URL_ENV: &str = "SAFE_GATEWAY_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreationConfig {
    /// Safe release new Safes are created with
    pub safe_version: SafeVersion,
    pub confirmation_timeout_ms: u64,
    pub confirmation_poll_interval_ms: u64,
    pub required_confirmations: u64,
    pub indexer: BackoffPolicy,
    pub gateway: GatewayConfig,
    /// Per-chain deployments, keyed by decimal chain ID; replace the built-ins
    pub chains: BTreeMap<String, ChainDeployment>,
}

impl Default for CreationConfig {
    fn default() -> Self {
        Self {
            safe_version: SafeVersion::LATEST,
            confirmation_timeout_ms: 390_000,
            confirmation_poll_interval_ms: 4_000,
            required_confirmations: 1,
            indexer: BackoffPolicy::default(),
            gateway: GatewayConfig::default(),
            chains: BTreeMap::new(),
        }
    }
}

impl CreationConfig {
    /// Reads `path`, applies environment overrides and validates
    pub fn from_toml(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidConfig(format!("failed reading config file {}: {e}", path.display()))
        })?;
        let mut cfg = Self::from_toml_str(&raw)?;
        cfg.apply_overrides(|name| std::env::var(name).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parses TOML without touching the environment
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::InvalidConfig(format!("failed parsing config toml: {e}")))
    }

    /// Applies overrides from `lookup` (normally the process environment)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(GATEWAY_URL_ENV) {
            if !url.trim().is_empty() {
                self.gateway.base_url = url.trim().to_string();
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.confirmation_timeout_ms == 0 {
            return Err(Error::InvalidConfig("confirmation_timeout_ms must be > 0".into()));
        }
        if self.confirmation_poll_interval_ms == 0 {
            return Err(Error::InvalidConfig("confirmation_poll_interval_ms must be > 0".into()));
        }
        self.indexer.validate()?;
        self.gateway.validate()?;
        self.chain_overrides()?;
        Ok(())
    }

    fn chain_overrides(&self) -> Result<Vec<(u64, &ChainDeployment)>> {
        self.chains
            .iter()
            .map(|(key, deployment)| {
                let chain_id = key
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| Error::InvalidConfig(format!("chains.{key}: not a chain id")))?;
                if deployment.versions.is_empty() {
                    return Err(Error::InvalidConfig(format!("chains.{key}: no versions")));
                }
                Ok((chain_id, deployment))
            })
            .collect()
    }

    /// Built-in registry with the configured chains layered on top
    pub fn registry(&self) -> Result<ContractRegistry> {
        let mut registry = ContractRegistry::with_defaults();
        for (chain_id, deployment) in self.chain_overrides()? {
            registry.insert(chain_id, deployment.clone());
        }
        Ok(registry)
    }

    pub fn watcher(&self) -> ConfirmationWatcher {
        ConfirmationWatcher::new()
            .with_timeout(Duration::from_millis(self.confirmation_timeout_ms))
            .with_poll_interval(Duration::from_millis(self.confirmation_poll_interval_ms))
            .with_confirmations(self.required_confirmations)
    }
}
