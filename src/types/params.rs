//! Safe creation parameters

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Owners, threshold and salt for a new Safe.
///
/// Owners are unique and `1 <= threshold <= owners.len()`; both are checked on
/// construction and on deserialization, so no network call ever sees invalid
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawParams")]
pub struct SafeCreationParams {
    owners: Vec<Address>,
    threshold: u64,
    salt_nonce: U256,
}

#[derive(Deserialize)]
struct RawParams {
    owners: Vec<Address>,
    threshold: u64,
    salt_nonce: U256,
}

impl TryFrom<RawParams> for SafeCreationParams {
    type Error = Error;

    fn try_from(raw: RawParams) -> Result<Self> {
        Self::new(raw.owners, raw.threshold, raw.salt_nonce)
    }
}

impl SafeCreationParams {
    /// Validates and builds the parameters. Owner order is preserved.
    pub fn new(owners: Vec<Address>, threshold: u64, salt_nonce: U256) -> Result<Self> {
        if owners.is_empty() {
            return Err(Error::InvalidConfig("at least one owner is required".into()));
        }
        for (i, owner) in owners.iter().enumerate() {
            if *owner == Address::ZERO {
                return Err(Error::InvalidConfig("zero address cannot be an owner".into()));
            }
            if owners[..i].contains(owner) {
                return Err(Error::DuplicateOwner(*owner));
            }
        }
        if threshold == 0 || threshold > owners.len() as u64 {
            return Err(Error::InvalidThreshold {
                threshold,
                owners: owners.len(),
            });
        }
        Ok(Self {
            owners,
            threshold,
            salt_nonce,
        })
    }

    pub fn owners(&self) -> &[Address] {
        &self.owners
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn salt_nonce(&self) -> U256 {
        self.salt_nonce
    }
}
