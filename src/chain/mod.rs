//! Chain-level configuration: contract addresses, Safe versions and the registry

pub mod config;
pub mod registry;
pub mod version;

pub use config::{chain_ids, ChainAddresses};
pub use registry::{ChainDeployment, ContractRegistry, ContractRole};
pub use version::{
    existing_safe_uses_l1_singleton, is_legacy_version, is_valid_safe_version, SafeVersion,
};
