//! Lifecycle coordinator
//!
//! Drives one creation attempt through
//! `AWAITING_WALLET_SIGNATURE -> SUBMITTING -> PROCESSING -> terminal`, with
//! `INDEXED` confirmed afterwards by the indexer poller. Every failure is
//! mapped to exactly one [`CreationStatus`]; raw errors only reach the logs.

use std::fmt;

use alloy::primitives::{Address, TxHash};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::cancel::CancelToken;
use crate::client::{is_wallet_rejection, ChainClient};
use crate::create2::predict_safe_address;
use crate::error::{Error, Result};
use crate::indexer::{BackoffPolicy, IndexerPoller, PollEvent, SafeIndexer, SafeInfo};
use crate::session::{SafeSession, SessionSlot};
use crate::submit::{submit_creation_tx, Submission};
use crate::types::{CreationStatus, PendingCreation, SafeCreationParams};
use crate::watch::{ConfirmationWatcher, ReplacementReason, WatchOutcome};

/// Classified failure of a creation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NoProvider,
    WalletRejected,
    SubmissionFailed,
    Reverted,
    ReplacedCancelled,
    ReplacedSpeedUp,
    ConfirmationTimeout,
    /// Deployed on chain but not yet discoverable
    IndexerTimeout,
    UnclassifiedFailure,
}

impl FailureKind {
    /// The status the user sees for this failure.
    ///
    /// A speed-up replacement is the effective deployment, and an indexer
    /// timeout leaves the on-chain `SUCCESS` in place. Unclassified
    /// confirmation failures read as `TIMEOUT`, not `ERROR`.
    pub fn status(&self) -> CreationStatus {
        match self {
            FailureKind::NoProvider => CreationStatus::Error,
            FailureKind::WalletRejected => CreationStatus::WalletRejected,
            FailureKind::SubmissionFailed => CreationStatus::Error,
            FailureKind::Reverted => CreationStatus::Reverted,
            FailureKind::ReplacedCancelled => CreationStatus::Error,
            FailureKind::ReplacedSpeedUp => CreationStatus::Success,
            FailureKind::ConfirmationTimeout => CreationStatus::Timeout,
            FailureKind::IndexerTimeout => CreationStatus::Success,
            FailureKind::UnclassifiedFailure => CreationStatus::Timeout,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::NoProvider => "no_provider",
            FailureKind::WalletRejected => "wallet_rejected",
            FailureKind::SubmissionFailed => "submission_failed",
            FailureKind::Reverted => "reverted",
            FailureKind::ReplacedCancelled => "replaced_cancelled",
            FailureKind::ReplacedSpeedUp => "replaced_speed_up",
            FailureKind::ConfirmationTimeout => "confirmation_timeout",
            FailureKind::IndexerTimeout => "indexer_timeout",
            FailureKind::UnclassifiedFailure => "unclassified",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_rejection(err: &Error) -> bool {
    matches!(err, Error::WalletRejected(_)) || is_wallet_rejection(&err.to_string())
}

/// Classifies a failed submission
pub fn classify_submission_error(err: &Error) -> FailureKind {
    if is_rejection(err) {
        FailureKind::WalletRejected
    } else if matches!(err, Error::NoProvider) {
        FailureKind::NoProvider
    } else {
        FailureKind::SubmissionFailed
    }
}

/// Classifies how a confirmation wait ended; `None` means mined successfully.
///
/// Wallet rejection is checked before anything receipt related.
pub fn classify_confirmation(result: &Result<WatchOutcome>) -> Option<FailureKind> {
    match result {
        Err(e) if is_rejection(e) => Some(FailureKind::WalletRejected),
        Ok(WatchOutcome::Replaced {
            reason: ReplacementReason::Cancelled,
            ..
        }) => Some(FailureKind::ReplacedCancelled),
        Ok(WatchOutcome::Replaced { .. }) => Some(FailureKind::ReplacedSpeedUp),
        Ok(WatchOutcome::Mined(receipt)) if !receipt.success => Some(FailureKind::Reverted),
        Ok(WatchOutcome::Mined(_)) => None,
        Err(Error::ConfirmationTimeout { .. }) => Some(FailureKind::ConfirmationTimeout),
        Err(_) => Some(FailureKind::UnclassifiedFailure),
    }
}

/// Owns the current status of one attempt and publishes every change
#[derive(Debug)]
pub struct CreationTracker {
    chain_id: u64,
    safe_address: Address,
    status: watch::Sender<CreationStatus>,
    detached: bool,
}

impl CreationTracker {
    pub fn new(chain_id: u64, safe_address: Address, initial: CreationStatus) -> Self {
        let (status, _) = watch::channel(initial);
        Self {
            chain_id,
            safe_address,
            status,
            detached: false,
        }
    }

    pub fn status(&self) -> CreationStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CreationStatus> {
        self.status.subscribe()
    }

    /// Moves to `next`, rejecting backward moves and anything out of a
    /// terminal state. Fails with [`Error::Cancelled`] once detached.
    pub fn advance(&mut self, next: CreationStatus) -> Result<()> {
        if self.detached {
            return Err(Error::Cancelled);
        }
        let current = self.status();
        if !current.can_transition_to(next) {
            return Err(Error::InvalidTransition {
                from: current.to_string(),
                to: next.to_string(),
            });
        }
        info!(
            chain_id = self.chain_id,
            safe = %self.safe_address,
            from = %current,
            to = %next,
            "creation status changed"
        );
        self.status.send_replace(next);
        Ok(())
    }

    /// Stops publishing; the last status stays readable
    pub fn detach(&mut self) {
        self.detached = true;
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }
}

/// One creation attempt, keyed by its predicted address
#[derive(Debug)]
pub struct CreationAttempt {
    params: SafeCreationParams,
    tracker: CreationTracker,
    pending: Option<PendingCreation>,
    replacement: Option<TxHash>,
}

impl CreationAttempt {
    fn new(
        chain_id: u64,
        safe_address: Address,
        params: SafeCreationParams,
        initial: CreationStatus,
    ) -> Self {
        Self {
            params,
            tracker: CreationTracker::new(chain_id, safe_address, initial),
            pending: None,
            replacement: None,
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.tracker.chain_id
    }

    pub fn safe_address(&self) -> Address {
        self.tracker.safe_address
    }

    pub fn params(&self) -> &SafeCreationParams {
        &self.params
    }

    pub fn status(&self) -> CreationStatus {
        self.tracker.status()
    }

    /// Receiver that sees every later status change
    pub fn subscribe(&self) -> watch::Receiver<CreationStatus> {
        self.tracker.subscribe()
    }

    /// The record to persist once submitted
    pub fn pending(&self) -> Option<&PendingCreation> {
        self.pending.as_ref()
    }

    pub fn tx_hash(&self) -> Option<TxHash> {
        self.pending.as_ref().map(|p| p.tx_hash)
    }

    /// Hash of the transaction that replaced ours, if any
    pub fn replacement(&self) -> Option<TxHash> {
        self.replacement
    }

    pub fn is_detached(&self) -> bool {
        self.tracker.is_detached()
    }

    fn expect_status(&self, expected: CreationStatus, next: CreationStatus) -> Result<()> {
        let current = self.status();
        if current != expected {
            return Err(Error::InvalidTransition {
                from: current.to_string(),
                to: next.to_string(),
            });
        }
        Ok(())
    }
}

/// Composes prediction, submission, confirmation and indexing for one session
pub struct SafeCreator<'s, C, I> {
    session: &'s SafeSession<C>,
    indexer: &'s I,
    watcher: ConfirmationWatcher,
    backoff: BackoffPolicy,
    cancel: CancelToken,
}

impl<'s, C: ChainClient, I: SafeIndexer> SafeCreator<'s, C, I> {
    pub fn new(session: &'s SafeSession<C>, indexer: &'s I) -> Self {
        Self {
            session,
            indexer,
            watcher: ConfirmationWatcher::default(),
            backoff: BackoffPolicy::default(),
            cancel: CancelToken::never(),
        }
    }

    /// Uses the slot's active session; [`Error::NoProvider`] when disconnected
    pub fn from_slot(slot: &'s SessionSlot<C>, indexer: &'s I) -> Result<Self> {
        Ok(Self::new(slot.session()?, indexer))
    }

    pub fn with_watcher(mut self, watcher: ConfirmationWatcher) -> Self {
        self.watcher = watcher;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Stops status updates once `cancel` fires
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn session(&self) -> &SafeSession<C> {
        self.session
    }

    /// Predicts the address and opens an attempt awaiting the wallet signature
    pub async fn prepare(&self, params: SafeCreationParams) -> Result<CreationAttempt> {
        let safe_address = predict_safe_address(self.session, &params).await?;
        Ok(CreationAttempt::new(
            self.session.chain_id(),
            safe_address,
            params,
            CreationStatus::AwaitingWalletSignature,
        ))
    }

    /// Reopens a persisted attempt in `PROCESSING`
    pub fn resume(&self, pending: PendingCreation) -> Result<CreationAttempt> {
        if pending.chain_id != self.session.chain_id() {
            return Err(Error::InvalidConfig(format!(
                "pending creation is for chain {}, session is on chain {}",
                pending.chain_id,
                self.session.chain_id()
            )));
        }
        if pending.version != self.session.version() {
            return Err(Error::InvalidConfig(format!(
                "pending creation uses Safe {}, session uses Safe {}",
                pending.version,
                self.session.version()
            )));
        }
        let mut attempt = CreationAttempt::new(
            pending.chain_id,
            pending.safe_address,
            pending.params.clone(),
            CreationStatus::Processing,
        );
        info!(
            chain_id = pending.chain_id,
            safe = %pending.safe_address,
            tx_hash = %pending.tx_hash,
            "resuming safe creation"
        );
        attempt.pending = Some(pending);
        Ok(attempt)
    }

    /// Records that the user declined before the wallet was asked to sign
    pub fn reject(&self, attempt: &mut CreationAttempt) -> Result<CreationStatus> {
        attempt.expect_status(
            CreationStatus::AwaitingWalletSignature,
            CreationStatus::WalletRejected,
        )?;
        self.settle(attempt, "sign", FailureKind::WalletRejected, &"declined by user")
    }

    /// Hands the creation tx to the wallet.
    ///
    /// Ends in `PROCESSING` on broadcast, otherwise in `WALLET_REJECTED` or
    /// `ERROR`. Once the wallet has been asked, the submission is not
    /// abandoned on cancellation: a cancel that lands during the broadcast
    /// returns [`Error::Cancelled`] with [`CreationAttempt::pending`] set.
    pub async fn submit(&self, attempt: &mut CreationAttempt) -> Result<CreationStatus> {
        attempt.expect_status(
            CreationStatus::AwaitingWalletSignature,
            CreationStatus::Submitting,
        )?;
        if self.cancel.is_cancelled() {
            attempt.tracker.detach();
            return Err(Error::Cancelled);
        }
        attempt.tracker.advance(CreationStatus::Submitting)?;

        match submit_creation_tx(self.session, &attempt.params).await {
            Ok(Submission { tx_hash, pending }) => {
                attempt.pending = Some(PendingCreation {
                    chain_id: attempt.chain_id(),
                    version: self.session.version(),
                    safe_address: attempt.safe_address(),
                    tx_hash,
                    params: attempt.params.clone(),
                    tx: pending,
                });
                if self.cancel.is_cancelled() {
                    attempt.tracker.detach();
                    return Err(Error::Cancelled);
                }
                attempt.tracker.advance(CreationStatus::Processing)?;
                Ok(CreationStatus::Processing)
            }
            Err(e) => {
                let kind = classify_submission_error(&e);
                self.settle(attempt, "submit", kind, &e)
            }
        }
    }

    /// Waits for the submitted tx and settles the attempt in a terminal status
    pub async fn confirm(&self, attempt: &mut CreationAttempt) -> Result<CreationStatus> {
        attempt.expect_status(CreationStatus::Processing, CreationStatus::Success)?;
        let Some(pending) = attempt.pending.clone() else {
            return Err(Error::InvalidConfig("attempt has no submitted transaction".into()));
        };

        let mut cancel = self.cancel.clone();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                attempt.tracker.detach();
                info!(
                    chain_id = pending.chain_id,
                    safe = %pending.safe_address,
                    tx_hash = %pending.tx_hash,
                    "stopped tracking safe creation; transaction stays resumable"
                );
                return Err(Error::Cancelled);
            }
            result = self.watcher.wait(self.session.client(), pending.tx_hash, &pending.tx) => result,
        };

        if let Ok(WatchOutcome::Replaced { replacement, .. }) = &result {
            attempt.replacement = Some(*replacement);
        }

        match classify_confirmation(&result) {
            None => {
                attempt.tracker.advance(CreationStatus::Success)?;
                Ok(CreationStatus::Success)
            }
            Some(kind) => {
                let error = match &result {
                    Ok(WatchOutcome::Mined(receipt)) => {
                        format!("transaction {} reverted", receipt.tx_hash)
                    }
                    Ok(WatchOutcome::Replaced {
                        reason,
                        replacement,
                        ..
                    }) => format!("transaction {reason} by {replacement}"),
                    Err(e) => e.to_string(),
                };
                self.settle(attempt, "confirm", kind, &error)
            }
        }
    }

    /// Polls the indexer after on-chain success and moves to `INDEXED`.
    ///
    /// An [`Error::IndexerTimeout`] leaves the attempt in `SUCCESS`.
    pub async fn await_indexed(
        &self,
        attempt: &mut CreationAttempt,
        events: Option<mpsc::UnboundedSender<PollEvent>>,
    ) -> Result<SafeInfo> {
        attempt.expect_status(CreationStatus::Success, CreationStatus::Indexed)?;

        let mut poller =
            IndexerPoller::new(self.indexer, self.backoff.clone()).with_cancel(self.cancel.clone());
        if let Some(events) = events {
            poller = poller.with_events(events);
        }

        match poller.poll(attempt.chain_id(), attempt.safe_address()).await {
            Ok(info) => {
                attempt.tracker.advance(CreationStatus::Indexed)?;
                Ok(info)
            }
            Err(Error::Cancelled) => {
                attempt.tracker.detach();
                Err(Error::Cancelled)
            }
            Err(e) => {
                warn!(
                    chain_id = attempt.chain_id(),
                    safe = %attempt.safe_address(),
                    stage = "index",
                    failure = %FailureKind::IndexerTimeout,
                    error = %e,
                    "safe deployed but not yet discoverable"
                );
                Err(e)
            }
        }
    }

    /// Prepares, asks `approve`, submits and waits for confirmation.
    ///
    /// Returns the attempt in whatever status it settled; indexing is left to
    /// [`await_indexed`](Self::await_indexed).
    pub async fn run(
        &self,
        params: SafeCreationParams,
        approve: impl FnOnce(&CreationAttempt) -> bool,
    ) -> Result<CreationAttempt> {
        let mut attempt = self.prepare(params).await?;
        if !approve(&attempt) {
            self.reject(&mut attempt)?;
            return Ok(attempt);
        }
        if self.submit(&mut attempt).await? == CreationStatus::Processing {
            self.confirm(&mut attempt).await?;
        }
        Ok(attempt)
    }

    fn settle(
        &self,
        attempt: &mut CreationAttempt,
        stage: &'static str,
        kind: FailureKind,
        error: &dyn fmt::Display,
    ) -> Result<CreationStatus> {
        let status = kind.status();
        if status == CreationStatus::Success {
            info!(
                chain_id = attempt.chain_id(),
                safe = %attempt.safe_address(),
                stage,
                failure = %kind,
                error = %error,
                "creation transaction replaced; using replacement"
            );
        } else {
            warn!(
                chain_id = attempt.chain_id(),
                safe = %attempt.safe_address(),
                stage,
                failure = %kind,
                %status,
                error = %error,
                "safe creation failed"
            );
        }
        attempt.tracker.advance(status)?;
        Ok(status)
    }
}
