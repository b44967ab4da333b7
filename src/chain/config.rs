//! Per-version Safe contract addresses

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Addresses of every contract role a Safe deployment touches.
///
/// The canonical sets are identical across chains (CREATE2 / deterministic
/// deployment); chains with bespoke deployments carry their own set in the
/// [`ContractRegistry`](super::ContractRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainAddresses {
    /// Safe singleton (mastercopy) for L1 chains
    pub safe_singleton: Address,
    /// Safe singleton emitting events for L2 indexing
    pub safe_singleton_l2: Address,
    /// MultiSend contract address
    pub multi_send: Address,
    /// MultiSendCallOnly contract address (introduced with v1.3.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_send_call_only: Option<Address>,
    /// Safe proxy factory address
    pub proxy_factory: Address,
    /// Fallback handler installed by `setup`
    pub fallback_handler: Address,
    /// CreateCall library
    pub create_call: Address,
    /// SignMessageLib (introduced with v1.3.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_message_lib: Option<Address>,
}

impl ChainAddresses {
    /// Canonical Safe v1.1.1 addresses
    pub fn v1_1_1() -> Self {
        Self {
            safe_singleton: address!("34CfAC646f301356fAa8B21e94227e3583Fe3F5F"),
            safe_singleton_l2: address!("34CfAC646f301356fAa8B21e94227e3583Fe3F5F"),
            multi_send: address!("8D29bE29923b68abfDD21e541b9374737B49cdAD"),
            multi_send_call_only: None,
            proxy_factory: address!("76E2cFc1F5Fa8F6a5b3fC4c8F4788F0116861F9B"),
            fallback_handler: address!("d5D82B6aDDc9027B22dCA772Aa68D5d74cdBdF44"),
            create_call: address!("8538FcBccba7f5303d2C679Fa5d7A629A8c9bf4A"),
            sign_message_lib: None,
        }
    }

    /// Canonical Safe v1.2.0 addresses; shares the v1.1.1 factory and libraries
    pub fn v1_2_0() -> Self {
        Self {
            safe_singleton: address!("6851D6fDFAfD08c0295C392436245E5bc78B0185"),
            safe_singleton_l2: address!("6851D6fDFAfD08c0295C392436245E5bc78B0185"),
            ..Self::v1_1_1()
        }
    }

    /// Canonical Safe v1.3.0 addresses
    pub fn v1_3_0() -> Self {
        Self {
            safe_singleton: address!("d9Db270c1B5E3Bd161E8c8503c55cEABeE709552"),
            safe_singleton_l2: address!("3E5c63644E683549055b9Be8653de26E0B4CD36E"),
            multi_send: address!("A238CBeb142c10Ef7Ad8442C6D1f9E89e07e7761"),
            multi_send_call_only: Some(address!("40A2aCCbd92BCA938b02010E17A5b8929b49130D")),
            proxy_factory: address!("a6B71E26C5e0845f74c812102Ca7114b6a896AB2"),
            fallback_handler: address!("f48f2B2d2a534e402487b3ee7C18c33Aec0Fe5e4"),
            create_call: address!("7cbB62EaA69F79e6873cD1ecB2392971036cFAa4"),
            sign_message_lib: Some(address!("A65387F16B013cf2Af4605Ad8aA5ec25a2cbA3a2")),
        }
    }

    /// Canonical Safe v1.4.1 addresses
    pub fn v1_4_1() -> Self {
        Self {
            safe_singleton: address!("41675C099F32341bf84BFc5382aF534df5C7461a"),
            safe_singleton_l2: address!("29fcB43b46531BcA003ddC8FCB67FFE91900C762"),
            multi_send: address!("38869bf66a61cF6bDB996A6aE40D5853Fd43B526"),
            multi_send_call_only: Some(address!("9641d764fc13c8B624c04430C7356C1C7C8102e2")),
            proxy_factory: address!("4e1DCf7AD4e460CfD30791CCC4F9c8a4f820ec67"),
            fallback_handler: address!("fd0732Dc9E303f09fCEf3a7388Ad10A83459Ec99"),
            create_call: address!("9b35Af71d77eaf8d7e40252370304687390A1A52"),
            sign_message_lib: Some(address!("d53cd0aB83D845Ac265BE939c57F53AD838012c9")),
        }
    }

    /// Dedicated v1.3.0 deployment on chain 48
    pub fn chain_48() -> Self {
        let singleton = address!("293557aAaBfeB45859366e42fc8AF80291425975");
        Self {
            safe_singleton: singleton,
            safe_singleton_l2: singleton,
            multi_send: address!("5782b77C665e99Dc19F8d69A63E1697846d51b01"),
            multi_send_call_only: Some(address!("26B5A5F53709fC8A06c69d644ba8222A3847816d")),
            proxy_factory: address!("AADFe7925b0Cad895665aDE74f5848043B8c4b7D"),
            fallback_handler: address!("0D2068Bbe4e3975adc8D6701234fBdA115CdAc19"),
            create_call: address!("4B7F9AF5Abc9699831BF3C72210121bD70357f0B"),
            sign_message_lib: Some(address!("3547de46e7D9e91FC93BbF7f16db71D1e5BD4f24")),
        }
    }

    /// Dedicated v1.3.0 deployment on chain 49
    pub fn chain_49() -> Self {
        let singleton = address!("605C2Bf0b455B0FbaAD80ce213dD7Be6E75ae772");
        Self {
            safe_singleton: singleton,
            safe_singleton_l2: singleton,
            multi_send: address!("815998473d01f05b1D50968a8632E2bA99bb6c50"),
            multi_send_call_only: Some(address!("cE8C3A33efa412C550457e1541bb2B5ca5162D86")),
            proxy_factory: address!("fF80789Fa04D0E7F7BfEc168A43a12b822D7927e"),
            fallback_handler: address!("F616b36A97EFa7743007ab0D3a3398BB8Fb9f63a"),
            create_call: address!("aBb87AF8d6BFB0353a94767fdEeF78FF551A8e85"),
            sign_message_lib: Some(address!("609d1E8a7544F946B0b2cBEb7Cf58B8F8256a7A0")),
        }
    }

    /// Returns the singleton for the given flavour
    pub fn singleton(&self, l1: bool) -> Address {
        if l1 {
            self.safe_singleton
        } else {
            self.safe_singleton_l2
        }
    }
}

/// Well-known chain IDs
pub mod chain_ids {
    pub const MAINNET: u64 = 1;
    pub const OPTIMISM: u64 = 10;
    pub const BSC: u64 = 56;
    pub const GNOSIS: u64 = 100;
    pub const POLYGON: u64 = 137;
    pub const BASE: u64 = 8453;
    pub const ARBITRUM: u64 = 42161;
    pub const AVALANCHE: u64 = 43114;
    pub const SEPOLIA: u64 = 11155111;
}
