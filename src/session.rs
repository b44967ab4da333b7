//! Wallet session context
//!
//! A [`SafeSession`] is created when a wallet connects and dropped when it
//! disconnects. Everything that needs the chain goes through an explicitly
//! passed session; [`SessionSlot`] models the connect/disconnect lifecycle for
//! hosts that keep one around.

use alloy::primitives::Address;
use tracing::info;

use crate::chain::{ContractRegistry, SafeVersion};
use crate::client::ChainClient;
use crate::error::{Error, Result};

/// A connected wallet bound to one chain and a Safe version
#[derive(Debug)]
pub struct SafeSession<C> {
    client: C,
    registry: ContractRegistry,
    chain_id: u64,
    version: SafeVersion,
}

impl<C: ChainClient> SafeSession<C> {
    /// Connects with the chain ID reported by the client.
    ///
    /// Fails with [`Error::UnsupportedChain`] if the registry has no
    /// deployments for the connected chain.
    pub async fn connect(
        client: C,
        registry: ContractRegistry,
        version: SafeVersion,
    ) -> Result<Self> {
        let chain_id = client.chain_id().await?;
        registry.addresses(chain_id, version)?;

        info!(chain_id, account = %client.account(), %version, "wallet session connected");

        Ok(Self {
            client,
            registry,
            chain_id,
            version,
        })
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn registry(&self) -> &ContractRegistry {
        &self.registry
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn version(&self) -> SafeVersion {
        self.version
    }

    /// The signing account
    pub fn account(&self) -> Address {
        self.client.account()
    }
}

/// Holds at most one session
#[derive(Debug)]
pub struct SessionSlot<C> {
    current: Option<SafeSession<C>>,
}

impl<C> Default for SessionSlot<C> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<C: ChainClient> SessionSlot<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a session, returning the one it replaces
    pub fn connect(&mut self, session: SafeSession<C>) -> Option<SafeSession<C>> {
        self.current.replace(session)
    }

    /// Drops the current session
    pub fn disconnect(&mut self) -> Option<SafeSession<C>> {
        let previous = self.current.take();
        if let Some(session) = &previous {
            info!(chain_id = session.chain_id(), "wallet session disconnected");
        }
        previous
    }

    /// The active session, or [`Error::NoProvider`]
    pub fn session(&self) -> Result<&SafeSession<C>> {
        self.current.as_ref().ok_or(Error::NoProvider)
    }

    pub fn is_connected(&self) -> bool {
        self.current.is_some()
    }
}
