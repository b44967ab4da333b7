//! Status mapping of the creation lifecycle

use std::time::Duration;

use alloy::primitives::{Bytes, U256};
use safe_creation::{
    cancel_pair, BackoffPolicy, ConfirmationWatcher, ContractRegistry, CreationStatus, Error,
    PendingCreation, SafeCreator, SafeSession, SafeVersion,
};

use crate::mock::{
    params, session, MockChain, MockIndexer, SendBehavior, ACCOUNT, REPLACEMENT_HASH, SENT_HASH,
    START_NONCE,
};

#[tokio::test]
async fn test_mined_transaction_succeeds_then_indexes() {
    let session = session(100).await;
    let indexer = MockIndexer::found_on(1);
    let creator = SafeCreator::new(&session, &indexer);

    let mut attempt = creator.prepare(params(1)).await.unwrap();
    assert_eq!(attempt.status(), CreationStatus::AwaitingWalletSignature);
    let statuses = attempt.subscribe();

    assert_eq!(creator.submit(&mut attempt).await.unwrap(), CreationStatus::Processing);
    assert_eq!(attempt.tx_hash(), Some(SENT_HASH));
    assert_eq!(*statuses.borrow(), CreationStatus::Processing);

    session.client().mine(SENT_HASH, true);
    assert_eq!(creator.confirm(&mut attempt).await.unwrap(), CreationStatus::Success);

    let info = creator.await_indexed(&mut attempt, None).await.unwrap();
    assert_eq!(info.address.value, attempt.safe_address());
    assert_eq!(attempt.status(), CreationStatus::Indexed);
    assert_eq!(*statuses.borrow(), CreationStatus::Indexed);
}

#[tokio::test]
async fn test_wallet_rejection_skips_confirmation() {
    let session = session(100).await;
    session.client().set_send(SendBehavior::Reject);
    let indexer = MockIndexer::found_on(1);
    let creator = SafeCreator::new(&session, &indexer);

    let attempt = creator.run(params(1), |_| true).await.unwrap();

    assert_eq!(attempt.status(), CreationStatus::WalletRejected);
    assert!(attempt.pending().is_none());
    assert_eq!(session.client().receipt_polls(), 0, "no confirmation wait may start");
}

#[tokio::test]
async fn test_declined_prompt_is_wallet_rejected() {
    let session = session(100).await;
    let indexer = MockIndexer::found_on(1);
    let creator = SafeCreator::new(&session, &indexer);

    let attempt = creator.run(params(1), |_| false).await.unwrap();

    assert_eq!(attempt.status(), CreationStatus::WalletRejected);
    assert!(session.client().sent().is_empty());
}

#[tokio::test]
async fn test_broadcast_failure_is_error() {
    let session = session(100).await;
    session
        .client()
        .set_send(SendBehavior::Fail("insufficient funds for gas * price + value".into()));
    let indexer = MockIndexer::found_on(1);
    let creator = SafeCreator::new(&session, &indexer);

    let attempt = creator.run(params(1), |_| true).await.unwrap();
    assert_eq!(attempt.status(), CreationStatus::Error);
    assert_eq!(session.client().receipt_polls(), 0);
}

#[tokio::test]
async fn test_reverted_receipt_is_reverted() {
    let session = session(100).await;
    let indexer = MockIndexer::found_on(1);
    let creator = SafeCreator::new(&session, &indexer);

    let mut attempt = creator.prepare(params(1)).await.unwrap();
    creator.submit(&mut attempt).await.unwrap();
    session.client().mine(SENT_HASH, false);

    assert_eq!(creator.confirm(&mut attempt).await.unwrap(), CreationStatus::Reverted);
    // terminal: indexing is refused
    assert!(matches!(
        creator.await_indexed(&mut attempt, None).await,
        Err(Error::InvalidTransition { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_replacement_is_error() {
    let session = session(100).await;
    let indexer = MockIndexer::found_on(1);
    let creator = SafeCreator::new(&session, &indexer);

    let mut attempt = creator.prepare(params(1)).await.unwrap();
    creator.submit(&mut attempt).await.unwrap();
    session
        .client()
        .mine_replacement(Some(ACCOUNT), Bytes::new(), U256::ZERO);

    assert_eq!(creator.confirm(&mut attempt).await.unwrap(), CreationStatus::Error);
    assert_eq!(attempt.replacement(), Some(REPLACEMENT_HASH));
}

#[tokio::test(start_paused = true)]
async fn test_repriced_replacement_is_success() {
    let session = session(100).await;
    let indexer = MockIndexer::found_on(1);
    let creator = SafeCreator::new(&session, &indexer);

    let mut attempt = creator.prepare(params(1)).await.unwrap();
    creator.submit(&mut attempt).await.unwrap();
    let pending = attempt.pending().unwrap().tx.clone();
    session
        .client()
        .mine_replacement(Some(pending.to), pending.data, pending.value);

    assert_eq!(creator.confirm(&mut attempt).await.unwrap(), CreationStatus::Success);
    assert_eq!(attempt.replacement(), Some(REPLACEMENT_HASH));
}

#[tokio::test(start_paused = true)]
async fn test_unresolved_wait_times_out() {
    let session = session(100).await;
    let indexer = MockIndexer::found_on(1);
    let creator = SafeCreator::new(&session, &indexer);

    let started = tokio::time::Instant::now();
    let attempt = creator.run(params(1), |_| true).await.unwrap();

    assert_eq!(attempt.status(), CreationStatus::Timeout);
    assert!(started.elapsed() >= Duration::from_millis(390_000));
    assert!(session.client().receipt_polls() > 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_receipt_poll_is_retried() {
    let session = session(100).await;
    let indexer = MockIndexer::found_on(1);
    let creator = SafeCreator::new(&session, &indexer);

    let mut attempt = creator.prepare(params(1)).await.unwrap();
    creator.submit(&mut attempt).await.unwrap();
    session.client().mine(SENT_HASH, true);
    session.client().with(|s| s.receipt_failures = 1);

    let started = tokio::time::Instant::now();
    assert_eq!(creator.confirm(&mut attempt).await.unwrap(), CreationStatus::Success);
    assert_eq!(session.client().receipt_polls(), 2);
    assert!(started.elapsed() >= Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn test_custom_watcher_timeout() {
    let session = session(100).await;
    let indexer = MockIndexer::found_on(1);
    let creator = SafeCreator::new(&session, &indexer)
        .with_watcher(ConfirmationWatcher::new().with_timeout(Duration::from_secs(30)));

    let started = tokio::time::Instant::now();
    let attempt = creator.run(params(1), |_| true).await.unwrap();

    assert_eq!(attempt.status(), CreationStatus::Timeout);
    assert!(started.elapsed() < Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_updates_and_resume_finishes() {
    let session = session(100).await;
    let indexer = MockIndexer::found_on(1);
    let (handle, token) = cancel_pair();
    let creator = SafeCreator::new(&session, &indexer).with_cancel(token);

    let mut attempt = creator.prepare(params(1)).await.unwrap();
    creator.submit(&mut attempt).await.unwrap();
    let statuses = attempt.subscribe();

    let cancel_later = async {
        tokio::time::sleep(Duration::from_secs(10)).await;
        handle.cancel();
    };
    let (result, ()) = tokio::join!(creator.confirm(&mut attempt), cancel_later);

    assert!(matches!(result, Err(Error::Cancelled)));
    assert!(attempt.is_detached());
    assert_eq!(*statuses.borrow(), CreationStatus::Processing);

    // the transaction stays valid and is picked up again later
    let pending: PendingCreation = attempt.pending().cloned().unwrap();
    session.client().mine(SENT_HASH, true);

    let fresh = SafeCreator::new(&session, &indexer);
    let mut resumed = fresh.resume(pending).unwrap();
    assert_eq!(resumed.status(), CreationStatus::Processing);
    assert_eq!(fresh.confirm(&mut resumed).await.unwrap(), CreationStatus::Success);
    assert_eq!(session.client().sent().len(), 1, "resume must not re-submit");
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_broadcast_keeps_pending() {
    let session = session(100).await;
    let indexer = MockIndexer::found_on(1);
    let (handle, token) = cancel_pair();
    session.client().with(|s| s.cancel_on_send = Some(handle));
    let creator = SafeCreator::new(&session, &indexer).with_cancel(token);

    let mut attempt = creator.prepare(params(1)).await.unwrap();
    let statuses = attempt.subscribe();

    assert!(matches!(creator.submit(&mut attempt).await, Err(Error::Cancelled)));
    assert!(attempt.is_detached());
    assert_eq!(*statuses.borrow(), CreationStatus::Submitting);
    assert_eq!(session.client().sent().len(), 1);

    // the broadcast tx is captured and can be followed up later
    let pending = attempt.pending().cloned().unwrap();
    assert_eq!(pending.tx_hash, SENT_HASH);
    assert_eq!(pending.tx.nonce, START_NONCE);

    session.client().mine(SENT_HASH, true);
    let fresh = SafeCreator::new(&session, &indexer);
    let mut resumed = fresh.resume(pending).unwrap();
    assert_eq!(fresh.confirm(&mut resumed).await.unwrap(), CreationStatus::Success);
}

#[tokio::test]
async fn test_resume_rejects_other_version() {
    let current = session(100).await;
    let indexer = MockIndexer::found_on(1);

    let creator = SafeCreator::new(&current, &indexer);
    let mut attempt = creator.prepare(params(1)).await.unwrap();
    creator.submit(&mut attempt).await.unwrap();
    let pending = attempt.pending().cloned().unwrap();
    assert_eq!(pending.version, SafeVersion::V1_3_0);

    let newer = SafeSession::connect(
        MockChain::new(100),
        ContractRegistry::with_defaults(),
        SafeVersion::V1_4_1,
    )
    .await
    .unwrap();
    let other = SafeCreator::new(&newer, &indexer);
    assert!(matches!(other.resume(pending), Err(Error::InvalidConfig(_))));
}

#[tokio::test]
async fn test_resume_rejects_other_chain() {
    let gnosis = session(100).await;
    let polygon = session(137).await;
    let indexer = MockIndexer::found_on(1);

    let creator = SafeCreator::new(&gnosis, &indexer);
    let mut attempt = creator.prepare(params(1)).await.unwrap();
    creator.submit(&mut attempt).await.unwrap();
    let pending = attempt.pending().cloned().unwrap();

    let other = SafeCreator::new(&polygon, &indexer);
    assert!(matches!(other.resume(pending), Err(Error::InvalidConfig(_))));
}

#[tokio::test(start_paused = true)]
async fn test_indexer_timeout_keeps_success() {
    let session = session(100).await;
    let indexer = MockIndexer::never();
    let creator = SafeCreator::new(&session, &indexer).with_backoff(BackoffPolicy {
        max_attempts: 3,
        ..Default::default()
    });

    let mut attempt = creator.prepare(params(1)).await.unwrap();
    creator.submit(&mut attempt).await.unwrap();
    session.client().mine(SENT_HASH, true);
    creator.confirm(&mut attempt).await.unwrap();

    let err = creator.await_indexed(&mut attempt, None).await.unwrap_err();
    assert!(matches!(err, Error::IndexerTimeout { attempts: 3, .. }));
    assert_eq!(attempt.status(), CreationStatus::Success);
    assert_eq!(indexer.calls(), 3);
}

#[tokio::test]
async fn test_steps_out_of_order_are_refused() {
    let session = session(100).await;
    let indexer = MockIndexer::found_on(1);
    let creator = SafeCreator::new(&session, &indexer);

    let mut attempt = creator.prepare(params(1)).await.unwrap();
    assert!(matches!(
        creator.confirm(&mut attempt).await,
        Err(Error::InvalidTransition { .. })
    ));

    creator.submit(&mut attempt).await.unwrap();
    assert!(matches!(
        creator.submit(&mut attempt).await,
        Err(Error::InvalidTransition { .. })
    ));
}
