//! Bounded exponential backoff over [`SafeIndexer::fetch_safe`]

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{SafeIndexer, SafeInfo};
use crate::cancel::CancelToken;
use crate::error::{Error, Result};

/// Retry schedule.
///
/// The first attempt runs immediately. Attempt `k >= 2` waits
/// `min(starting_delay * time_multiple^(k-2), max_delay)`. With the defaults
/// that is 750ms, 1.5s, 3s, 6s, 12s and then 20s for every remaining attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffPolicy {
    pub starting_delay_ms: u64,
    pub max_delay_ms: u64,
    pub max_attempts: u32,
    pub time_multiple: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            starting_delay_ms: 750,
            max_delay_ms: 20_000,
            max_attempts: 19,
            time_multiple: 2,
        }
    }
}

impl BackoffPolicy {
    /// Delay slept before 1-based `attempt`
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = u64::from(self.time_multiple)
            .checked_pow(attempt - 2)
            .unwrap_or(u64::MAX);
        let delay = self.starting_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay.min(self.max_delay_ms))
    }

    /// Sum of all delays when every attempt fails
    pub fn total_delay(&self) -> Duration {
        (1..=self.max_attempts).map(|a| self.delay_before(a)).sum()
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("indexer.max_attempts must be at least 1".into()));
        }
        if self.time_multiple == 0 {
            return Err(Error::InvalidConfig("indexer.time_multiple must be at least 1".into()));
        }
        if self.starting_delay_ms > self.max_delay_ms {
            return Err(Error::InvalidConfig(
                "indexer.starting_delay_ms exceeds indexer.max_delay_ms".into(),
            ));
        }
        Ok(())
    }
}

/// Progress reported while polling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    /// An attempt is starting
    Attempt { attempt: u32, max_attempts: u32 },
    /// The attempt failed; the next one runs after `next_delay`
    NotIndexed {
        attempt: u32,
        next_delay: Duration,
        reason: String,
    },
    /// The Safe record was returned
    Indexed { attempt: u32 },
}

/// Polls the indexer until a Safe shows up, attempts run out or the token fires
pub struct IndexerPoller<'a, I> {
    indexer: &'a I,
    policy: BackoffPolicy,
    cancel: CancelToken,
    events: Option<mpsc::UnboundedSender<PollEvent>>,
}

impl<'a, I: SafeIndexer> IndexerPoller<'a, I> {
    pub fn new(indexer: &'a I, policy: BackoffPolicy) -> Self {
        Self {
            indexer,
            policy,
            cancel: CancelToken::never(),
            events: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Sends [`PollEvent`]s to `events`; a closed receiver is ignored
    pub fn with_events(mut self, events: mpsc::UnboundedSender<PollEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Returns the indexed record, [`Error::IndexerTimeout`] once every
    /// attempt failed, or [`Error::Cancelled`].
    pub async fn poll(&self, chain_id: u64, address: Address) -> Result<SafeInfo> {
        let mut cancel = self.cancel.clone();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = self.run_attempts(chain_id, address) => result,
        }
    }

    async fn run_attempts(&self, chain_id: u64, address: Address) -> Result<SafeInfo> {
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let delay = self.policy.delay_before(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            self.emit(PollEvent::Attempt {
                attempt,
                max_attempts,
            });

            let reason = match self.indexer.fetch_safe(chain_id, address).await {
                Ok(Some(info)) => {
                    info!(chain_id, safe = %address, attempt, "safe indexed");
                    self.emit(PollEvent::Indexed { attempt });
                    return Ok(info);
                }
                Ok(None) => "safe not indexed yet".to_string(),
                Err(e) => e.to_string(),
            };

            if attempt < max_attempts {
                let next_delay = self.policy.delay_before(attempt + 1);
                info!(
                    chain_id,
                    safe = %address,
                    attempt,
                    max_attempts,
                    next_delay_ms = next_delay.as_millis() as u64,
                    %reason,
                    "waiting for gateway to index safe"
                );
                self.emit(PollEvent::NotIndexed {
                    attempt,
                    next_delay,
                    reason,
                });
            }
        }

        warn!(chain_id, safe = %address, attempts = max_attempts, "gateway never returned safe");
        Err(Error::IndexerTimeout {
            address,
            attempts: max_attempts,
        })
    }

    fn emit(&self, event: PollEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}

/// A poll running on its own task
#[derive(Debug)]
pub struct PollTask {
    pub events: mpsc::UnboundedReceiver<PollEvent>,
    handle: JoinHandle<Result<SafeInfo>>,
}

impl PollTask {
    pub fn spawn<I: SafeIndexer + 'static>(
        indexer: Arc<I>,
        policy: BackoffPolicy,
        cancel: CancelToken,
        chain_id: u64,
        address: Address,
    ) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let handle = tokio::spawn(async move {
            IndexerPoller::new(indexer.as_ref(), policy)
                .with_cancel(cancel)
                .with_events(tx)
                .poll(chain_id, address)
                .await
        });
        Self { events, handle }
    }

    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Waits for the task; an aborted task yields [`Error::Cancelled`]
    pub async fn join(self) -> Result<SafeInfo> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(Error::Cancelled),
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }
}
