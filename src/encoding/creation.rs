//! Creation transaction encoding
//!
//! The creation transaction is a single `createProxyWithNonce` call on the
//! proxy factory whose initializer is an ABI-encoded `Safe.setup()` call.
//! Everything here is pure: no provider, no signer.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::chain::{ContractRegistry, SafeVersion};
use crate::contracts::{ISafeProxyFactory, ISafeSetup};
use crate::error::Result;
use crate::types::SafeCreationParams;

/// Encodes the Safe.setup() call for proxy initialization
///
/// No setup delegate call and no deployment payment: `to`, `paymentToken`
/// and `paymentReceiver` are zero, `data` is empty.
pub fn encode_setup_call(owners: &[Address], threshold: u64, fallback_handler: Address) -> Bytes {
    let setup_call = ISafeSetup::setupCall {
        _owners: owners.to_vec(),
        _threshold: U256::from(threshold),
        to: Address::ZERO,
        data: Bytes::new(),
        fallbackHandler: fallback_handler,
        paymentToken: Address::ZERO,
        payment: U256::ZERO,
        paymentReceiver: Address::ZERO,
    };

    Bytes::from(setup_call.abi_encode())
}

/// Encodes `createProxyWithNonce(singleton, initializer, saltNonce)`
pub fn encode_create_proxy_call(singleton: Address, initializer: Bytes, salt_nonce: U256) -> Bytes {
    let call = ISafeProxyFactory::createProxyWithNonceCall {
        _singleton: singleton,
        initializer,
        saltNonce: salt_nonce,
    };

    Bytes::from(call.abi_encode())
}

/// A fully resolved creation transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeCreationTx {
    /// Proxy factory the call is sent to
    pub to: Address,
    /// Singleton the new proxy will delegate to
    pub singleton: Address,
    /// Encoded `setup` call, also the CREATE2 salt input
    pub initializer: Bytes,
    /// Encoded `createProxyWithNonce` call
    pub data: Bytes,
    /// Always zero
    pub value: U256,
}

/// Resolves the deployment addresses for `chain_id`/`version` and encodes the
/// creation transaction for `params`.
pub fn encode_safe_creation_tx(
    params: &SafeCreationParams,
    registry: &ContractRegistry,
    chain_id: u64,
    version: SafeVersion,
) -> Result<SafeCreationTx> {
    let addresses = registry.addresses(chain_id, version)?;
    let singleton = registry.singleton(chain_id, version)?;

    let initializer = encode_setup_call(
        params.owners(),
        params.threshold(),
        addresses.fallback_handler,
    );
    let data = encode_create_proxy_call(singleton, initializer.clone(), params.salt_nonce());

    Ok(SafeCreationTx {
        to: addresses.proxy_factory,
        singleton,
        initializer,
        data,
        value: U256::ZERO,
    })
}
