//! Contract registry keyed by chain ID and Safe version

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use super::config::{chain_ids, ChainAddresses};
use super::version::SafeVersion;
use crate::error::{Error, Result};

/// The roles a contract address can play in a Safe deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractRole {
    MultiSend,
    Singleton,
    SingletonL2,
    ProxyFactory,
    MultiSendCallOnly,
    FallbackHandler,
    CreateCall,
    SignMessageLib,
}

impl ContractRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractRole::MultiSend => "multi-send",
            ContractRole::Singleton => "singleton",
            ContractRole::SingletonL2 => "singleton-l2",
            ContractRole::ProxyFactory => "proxy-factory",
            ContractRole::MultiSendCallOnly => "multi-send-call-only",
            ContractRole::FallbackHandler => "fallback-handler",
            ContractRole::CreateCall => "create-call",
            ContractRole::SignMessageLib => "sign-message-lib",
        }
    }
}

impl fmt::Display for ContractRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployments available on one chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainDeployment {
    /// Whether new Safes on this chain use the L2 singleton
    #[serde(default)]
    pub l2: bool,
    /// Addresses per Safe version
    pub versions: BTreeMap<SafeVersion, ChainAddresses>,
}

impl ChainDeployment {
    /// Every canonical release at its deterministic addresses
    pub fn canonical(l2: bool) -> Self {
        let versions = BTreeMap::from([
            (SafeVersion::V1_1_1, ChainAddresses::v1_1_1()),
            (SafeVersion::V1_2_0, ChainAddresses::v1_2_0()),
            (SafeVersion::V1_3_0, ChainAddresses::v1_3_0()),
            (SafeVersion::V1_4_1, ChainAddresses::v1_4_1()),
        ]);
        Self { l2, versions }
    }

    /// A chain that only carries a dedicated v1.3.0 deployment
    pub fn single(version: SafeVersion, addresses: ChainAddresses) -> Self {
        Self {
            l2: false,
            versions: BTreeMap::from([(version, addresses)]),
        }
    }
}

/// Single source of truth for contract addresses, injected wherever a
/// deployment address is needed.
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    chains: HashMap<u64, ChainDeployment>,
}

impl ContractRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the canonical deployments plus the bespoke chain 48/49 networks.
    ///
    /// Ethereum mainnet uses the L1 singleton; every other listed chain uses L2.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert(chain_ids::MAINNET, ChainDeployment::canonical(false));
        for chain_id in [
            chain_ids::OPTIMISM,
            chain_ids::BSC,
            chain_ids::GNOSIS,
            chain_ids::POLYGON,
            chain_ids::BASE,
            chain_ids::ARBITRUM,
            chain_ids::AVALANCHE,
            chain_ids::SEPOLIA,
        ] {
            registry.insert(chain_id, ChainDeployment::canonical(true));
        }
        registry.insert(
            48,
            ChainDeployment::single(SafeVersion::V1_3_0, ChainAddresses::chain_48()),
        );
        registry.insert(
            49,
            ChainDeployment::single(SafeVersion::V1_3_0, ChainAddresses::chain_49()),
        );
        registry
    }

    /// Adds or replaces the deployments for a chain
    pub fn insert(&mut self, chain_id: u64, deployment: ChainDeployment) {
        self.chains.insert(chain_id, deployment);
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_chain(mut self, chain_id: u64, deployment: ChainDeployment) -> Self {
        self.insert(chain_id, deployment);
        self
    }

    /// Returns the deployments for a chain
    pub fn chain(&self, chain_id: u64) -> Result<&ChainDeployment> {
        self.chains
            .get(&chain_id)
            .ok_or(Error::UnsupportedChain(chain_id))
    }

    /// Returns the full address set for a chain/version pair
    pub fn addresses(&self, chain_id: u64, version: SafeVersion) -> Result<&ChainAddresses> {
        self.chain(chain_id)?
            .versions
            .get(&version)
            .ok_or_else(|| Error::UnsupportedVersion(format!("{version} on chain {chain_id}")))
    }

    /// Looks up a single role
    pub fn address(
        &self,
        chain_id: u64,
        version: SafeVersion,
        role: ContractRole,
    ) -> Result<Address> {
        let addrs = self.addresses(chain_id, version)?;
        let found = match role {
            ContractRole::MultiSend => Some(addrs.multi_send),
            ContractRole::Singleton => Some(addrs.safe_singleton),
            ContractRole::SingletonL2 => Some(addrs.safe_singleton_l2),
            ContractRole::ProxyFactory => Some(addrs.proxy_factory),
            ContractRole::MultiSendCallOnly => addrs.multi_send_call_only,
            ContractRole::FallbackHandler => Some(addrs.fallback_handler),
            ContractRole::CreateCall => Some(addrs.create_call),
            ContractRole::SignMessageLib => addrs.sign_message_lib,
        };
        found.ok_or_else(|| Error::MissingContract {
            role: role.as_str(),
            chain_id,
            version: version.to_string(),
        })
    }

    /// Whether the L1 singleton applies. Legacy versions are always L1.
    pub fn uses_l1_singleton(&self, chain_id: u64, version: SafeVersion) -> Result<bool> {
        if version.is_legacy() {
            return Ok(true);
        }
        Ok(!self.chain(chain_id)?.l2)
    }

    /// The singleton new proxies on this chain delegate to
    pub fn singleton(&self, chain_id: u64, version: SafeVersion) -> Result<Address> {
        let l1 = self.uses_l1_singleton(chain_id, version)?;
        let role = if l1 {
            ContractRole::Singleton
        } else {
            ContractRole::SingletonL2
        };
        self.address(chain_id, version, role)
    }
}
