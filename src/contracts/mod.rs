//! Contract ABI definitions used by the creation flow

use alloy::sol;

sol! {
    /// Safe setup entry point, identical from v1.1.1 through v1.4.1
    #[sol(rpc)]
    interface ISafeSetup {
        function setup(
            address[] calldata _owners,
            uint256 _threshold,
            address to,
            bytes calldata data,
            address fallbackHandler,
            address paymentToken,
            uint256 payment,
            address payable paymentReceiver
        ) external;
    }

    /// Safe proxy factory
    #[sol(rpc)]
    interface ISafeProxyFactory {
        /// Deploys a proxy at the CREATE2 address derived from the initializer and salt nonce
        function createProxyWithNonce(
            address _singleton,
            bytes memory initializer,
            uint256 saltNonce
        ) external returns (address proxy);

        /// Bytecode prefix of every proxy the factory deploys
        function proxyCreationCode() external pure returns (bytes memory);
    }
}
