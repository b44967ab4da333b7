//! CREATE2 address computation for Safe proxy deployment
//!
//! The Safe proxy factory deploys proxies at deterministic addresses based on
//! the singleton address, initializer data, and salt nonce, so the address of
//! a new Safe is known before anything is submitted.

use alloy::primitives::{keccak256, Address, Bytes, U256};
use alloy::sol_types::{SolCall, SolValue};
use tracing::debug;

use crate::client::ChainClient;
use crate::contracts::ISafeProxyFactory;
use crate::encoding::encode_safe_creation_tx;
use crate::error::{Error, Result};
use crate::session::{SafeSession, SessionSlot};
use crate::types::SafeCreationParams;

/// Address the factory deploys a proxy to.
///
/// The salt is `keccak256(keccak256(initializer) ++ saltNonce)` and the init
/// code is the factory's `proxyCreationCode` followed by the singleton as a
/// 32-byte word.
pub fn compute_create2_address(
    factory: Address,
    singleton: Address,
    initializer: &Bytes,
    salt_nonce: U256,
    creation_code: &Bytes,
) -> Address {
    let salt = keccak256((keccak256(initializer), salt_nonce).abi_encode_packed());
    let init_code = [&creation_code[..], singleton.into_word().as_slice()].concat();
    factory.create2(salt, keccak256(init_code))
}

/// Reads `proxyCreationCode()` from the factory
pub async fn fetch_proxy_creation_code<C: ChainClient>(client: &C, factory: Address) -> Result<Bytes> {
    let call = ISafeProxyFactory::proxyCreationCodeCall {};
    let raw = client
        .call(factory, Bytes::from(call.abi_encode()))
        .await
        .map_err(|e| Error::Fetch {
            what: "proxy creation code",
            reason: e.to_string(),
        })?;

    let code = ISafeProxyFactory::proxyCreationCodeCall::abi_decode_returns(&raw)?;
    if code.is_empty() {
        return Err(Error::Fetch {
            what: "proxy creation code",
            reason: format!("factory {factory} returned empty code"),
        });
    }
    Ok(code)
}

/// Predicts the counterfactual address of the Safe described by `params`.
///
/// Only reads from the chain; identical inputs always give the same address.
pub async fn predict_safe_address<C: ChainClient>(
    session: &SafeSession<C>,
    params: &SafeCreationParams,
) -> Result<Address> {
    let tx = encode_safe_creation_tx(
        params,
        session.registry(),
        session.chain_id(),
        session.version(),
    )?;
    let creation_code = fetch_proxy_creation_code(session.client(), tx.to).await?;

    let address = compute_create2_address(
        tx.to,
        tx.singleton,
        &tx.initializer,
        params.salt_nonce(),
        &creation_code,
    );

    debug!(
        chain_id = session.chain_id(),
        safe = %address,
        salt_nonce = %params.salt_nonce(),
        "predicted safe address"
    );

    Ok(address)
}

impl<C: ChainClient> SessionSlot<C> {
    /// Predicts with the active session; [`Error::NoProvider`] when disconnected
    pub async fn predict_address(&self, params: &SafeCreationParams) -> Result<Address> {
        predict_safe_address(self.session()?, params).await
    }
}
