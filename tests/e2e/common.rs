//! Common test utilities for E2E tests

use std::time::Duration;

use alloy::network::{AnyNetwork, EthereumWallet};
use alloy::node_bindings::{Anvil, AnvilInstance};
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use safe_creation::{
    ConfirmationWatcher, ContractRegistry, Result, RpcClient, SafeCollectible, SafeIndexer,
    SafeInfo, SafeSession, SafeVersion,
};

/// Macro to skip tests when ETH_RPC_URL is not set
#[macro_export]
macro_rules! skip_if_no_rpc {
    () => {
        if std::env::var("ETH_RPC_URL").is_err() {
            eprintln!("Skipping test: ETH_RPC_URL not set");
            return;
        }
    };
}

sol! {
    #[sol(rpc)]
    interface ISafeOwners {
        function getOwners() external view returns (address[] memory);
        function getThreshold() external view returns (uint256);
        function VERSION() external view returns (string memory);
    }
}

pub type TestProvider = DynProvider<AnyNetwork>;

/// Indexer that never knows any Safe; the e2e runs skip the gateway
pub struct OfflineIndexer;

impl SafeIndexer for OfflineIndexer {
    async fn fetch_safe(&self, _chain_id: u64, _address: Address) -> Result<Option<SafeInfo>> {
        Ok(None)
    }

    async fn fetch_collectibles(
        &self,
        _chain_id: u64,
        _address: Address,
    ) -> Result<Vec<SafeCollectible>> {
        Ok(Vec::new())
    }
}

/// Test harness that spawns Anvil with forking and provides a session
pub struct TestHarness {
    pub provider: TestProvider,
    pub signer: PrivateKeySigner,
    pub _anvil: AnvilInstance,
}

impl TestHarness {
    /// Creates a new test harness with Anvil forking from ETH_RPC_URL
    ///
    /// Supports optional environment variables for rate limiting:
    /// - `ANVIL_COMPUTE_UNITS_PER_SECOND`: Compute units per second
    /// - `ANVIL_RETRIES`: Number of retries for RPC requests
    pub async fn new() -> Self {
        let rpc_url = std::env::var("ETH_RPC_URL").expect("ETH_RPC_URL must be set");

        let mut args = vec!["--hardfork".to_string(), "cancun".to_string()];
        if let Ok(cus) = std::env::var("ANVIL_COMPUTE_UNITS_PER_SECOND") {
            args.push("--compute-units-per-second".to_string());
            args.push(cus);
        }
        if let Ok(retries) = std::env::var("ANVIL_RETRIES") {
            args.push("--retries".to_string());
            args.push(retries);
        }

        let args_ref: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
        let anvil = Anvil::new().fork(rpc_url).args(args_ref).spawn();

        let signer: PrivateKeySigner = anvil.keys()[0].clone().into();
        let provider = ProviderBuilder::new()
            .network::<AnyNetwork>()
            .wallet(EthereumWallet::from(signer.clone()))
            .connect_http(anvil.endpoint_url())
            .erased();

        Self {
            provider,
            signer,
            _anvil: anvil,
        }
    }

    pub fn signer_address(&self) -> Address {
        self.signer.address()
    }

    /// Connects a session for the forked chain
    pub async fn session(&self) -> SafeSession<RpcClient<TestProvider>> {
        SafeSession::connect(
            RpcClient::new(self.provider.clone(), self.signer_address()),
            ContractRegistry::with_defaults(),
            SafeVersion::V1_3_0,
        )
        .await
        .expect("forked chain should be in the registry")
    }

    /// Watcher tuned for an automining node
    pub fn watcher(&self) -> ConfirmationWatcher {
        ConfirmationWatcher::new()
            .with_poll_interval(Duration::from_millis(250))
            .with_timeout(Duration::from_secs(30))
    }

    pub async fn owners_of(&self, safe: Address) -> Vec<Address> {
        ISafeOwners::new(safe, &self.provider)
            .getOwners()
            .call()
            .await
            .expect("getOwners")
    }

    pub async fn threshold_of(&self, safe: Address) -> u64 {
        ISafeOwners::new(safe, &self.provider)
            .getThreshold()
            .call()
            .await
            .expect("getThreshold")
            .to::<u64>()
    }

    pub async fn is_deployed(&self, address: Address) -> bool {
        !self
            .provider
            .get_code_at(address)
            .await
            .expect("get_code_at")
            .is_empty()
    }
}
