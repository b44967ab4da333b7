//! Creation status

use std::fmt;

use serde::{Deserialize, Serialize};

/// User-facing status of a creation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreationStatus {
    /// Address predicted, waiting for the user to sign
    AwaitingWalletSignature,
    /// Transaction handed to the wallet
    Submitting,
    /// Broadcast, waiting to be mined
    Processing,
    /// Mined and visible on the gateway
    Indexed,
    WalletRejected,
    Reverted,
    Timeout,
    Error,
    Success,
}

impl CreationStatus {
    /// Terminal statuses never transition again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CreationStatus::Success
                | CreationStatus::Reverted
                | CreationStatus::Timeout
                | CreationStatus::Error
                | CreationStatus::WalletRejected
        )
    }

    /// Position along the happy path; terminal statuses share the last rank
    fn rank(&self) -> u8 {
        match self {
            CreationStatus::AwaitingWalletSignature => 0,
            CreationStatus::Submitting => 1,
            CreationStatus::Processing => 2,
            _ => 3,
        }
    }

    /// Whether `self -> next` is a forward move of the state machine.
    ///
    /// `Indexed` is only reachable from `Success`.
    pub fn can_transition_to(&self, next: CreationStatus) -> bool {
        if next == CreationStatus::Indexed {
            return *self == CreationStatus::Success;
        }
        if self.is_terminal() || *self == CreationStatus::Indexed {
            return false;
        }
        next.rank() > self.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CreationStatus::AwaitingWalletSignature => "AWAITING_WALLET_SIGNATURE",
            CreationStatus::Submitting => "SUBMITTING",
            CreationStatus::Processing => "PROCESSING",
            CreationStatus::Indexed => "INDEXED",
            CreationStatus::WalletRejected => "WALLET_REJECTED",
            CreationStatus::Reverted => "REVERTED",
            CreationStatus::Timeout => "TIMEOUT",
            CreationStatus::Error => "ERROR",
            CreationStatus::Success => "SUCCESS",
        }
    }
}

impl fmt::Display for CreationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
