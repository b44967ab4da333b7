use std::path::PathBuf;

use alloy::primitives::{Address, TxHash, U256};
use safe_creation::{CreationStatus, PollEvent, SafeCollectible, SafeInfo};
use serde::Serialize;

#[derive(Serialize)]
pub struct PredictionOutput {
    pub safe_address: Address,
    pub chain_id: u64,
    pub safe_version: String,
    pub factory: Address,
    pub singleton: Address,
    pub owners: Vec<Address>,
    pub threshold: u64,
    pub salt_nonce: U256,
    pub already_deployed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_estimate: Option<u64>,
}

impl PredictionOutput {
    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
        } else {
            println!("Safe Address: {}", self.safe_address);
            println!("  Chain ID: {}", self.chain_id);
            println!("  Version: {}", self.safe_version);
            println!("  Factory: {}", self.factory);
            println!("  Singleton: {}", self.singleton);
            println!("  Salt Nonce: {}", self.salt_nonce);
            println!("  Threshold: {}", self.threshold);
            println!("  Owners:");
            for (i, owner) in self.owners.iter().enumerate() {
                println!("    {}: {}", i + 1, owner);
            }
            if let Some(gas) = self.gas_estimate {
                println!("  Estimated Gas: {}", gas);
            }
            if self.already_deployed {
                println!("  Status: Already deployed");
            }
        }
    }
}

#[derive(Serialize)]
pub struct CreationOutput {
    pub safe_address: Address,
    pub chain_id: u64,
    /// `None` when nothing was submitted because the Safe already exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CreationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<TxHash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replaced_by: Option<TxHash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_file: Option<PathBuf>,
    pub owners: Vec<Address>,
    pub threshold: u64,
    pub already_deployed: bool,
}

impl CreationOutput {
    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
        } else {
            println!("Safe Address: {}", self.safe_address);
            if self.already_deployed {
                println!("  Status: Already deployed");
            } else if let Some(status) = self.status {
                println!("  Status: {}", status);
            }
            if let Some(tx_hash) = self.tx_hash {
                println!("  Tx Hash: {}", tx_hash);
            }
            if let Some(replacement) = self.replaced_by {
                println!("  Replaced By: {}", replacement);
            }
            if let Some(path) = &self.pending_file {
                println!("  Resume With: --pending {}", path.display());
            }
            println!("  Threshold: {}", self.threshold);
            println!("  Owners:");
            for (i, owner) in self.owners.iter().enumerate() {
                println!("    {}: {}", i + 1, owner);
            }
        }
    }
}

#[derive(Serialize)]
pub struct SafeInfoOutput {
    pub address: Address,
    pub chain_id: u64,
    pub nonce: u64,
    pub threshold: u64,
    pub owners: Vec<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub supported_version: bool,
    pub l1_singleton: bool,
}

impl SafeInfoOutput {
    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
        } else {
            println!("Safe: {}", self.address);
            println!("Chain ID: {}", self.chain_id);
            println!("Nonce: {}", self.nonce);
            println!("Threshold: {}", self.threshold);
            match &self.version {
                Some(version) if self.supported_version => println!("Version: {}", version),
                Some(version) => println!("Version: {} (unsupported)", version),
                None => println!("Version: unknown"),
            }
            println!("Singleton: {}", if self.l1_singleton { "L1" } else { "L2" });
            println!("Owners:");
            for (i, owner) in self.owners.iter().enumerate() {
                println!("  {}: {}", i + 1, owner);
            }
        }
    }
}

impl SafeInfoOutput {
    pub fn from_info(chain_id: u64, info: &SafeInfo) -> Self {
        let version = info.version.clone();
        let semver = version.as_deref().unwrap_or_default();
        Self {
            address: info.address.value,
            chain_id,
            nonce: info.nonce,
            threshold: info.threshold,
            owners: info.owners.iter().map(|o| o.value).collect(),
            supported_version: safe_creation::is_valid_safe_version(version.as_deref()),
            l1_singleton: safe_creation::chain::existing_safe_uses_l1_singleton(chain_id, semver),
            version,
        }
    }
}

#[derive(Serialize)]
pub struct CollectiblesOutput {
    pub safe: Address,
    pub chain_id: u64,
    pub collectibles: Vec<SafeCollectible>,
}

impl CollectiblesOutput {
    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
        } else {
            println!("Collectibles of {} ({}):", self.safe, self.collectibles.len());
            for item in &self.collectibles {
                let name = item.name.as_deref().unwrap_or(&item.token_name);
                println!("  {} #{} ({} {})", name, item.id, item.token_symbol, item.address);
            }
        }
    }
}

/// Prints one status transition (text mode only)
pub fn print_status(status: CreationStatus, json: bool) {
    if !json {
        println!("Status: {}", status);
    }
}

/// Prints indexer progress (text mode only)
pub fn print_poll_event(event: &PollEvent, json: bool) {
    if json {
        return;
    }
    match event {
        PollEvent::Attempt {
            attempt,
            max_attempts,
        } => println!("Checking gateway ({}/{})...", attempt, max_attempts),
        PollEvent::NotIndexed { next_delay, .. } => {
            println!("  Not indexed yet, retrying in {:.2}s", next_delay.as_secs_f64())
        }
        PollEvent::Indexed { .. } => println!("  Indexed"),
    }
}

pub fn confirm_prompt(message: &str) -> bool {
    use dialoguer::Confirm;

    Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .unwrap_or(false)
}
