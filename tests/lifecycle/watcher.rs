//! Confirmation watcher against the in-memory chain

use std::time::Duration;

use alloy::primitives::{address, Bytes, U256};
use safe_creation::{
    submit_creation_tx, ConfirmationWatcher, Error, PendingCreationTx, ReplacementReason,
    WatchOutcome,
};

use crate::mock::{params, session, MockChain, REPLACEMENT_HASH, SENT_HASH};

async fn submitted(chain: u64) -> (safe_creation::SafeSession<MockChain>, PendingCreationTx) {
    let session = session(chain).await;
    let submission = submit_creation_tx(&session, &params(9)).await.unwrap();
    (session, submission.pending)
}

#[tokio::test(start_paused = true)]
async fn test_waits_until_receipt_appears() {
    let (session, pending) = submitted(100).await;
    let client = session.client();
    client.mine(SENT_HASH, true);
    client.with(|s| s.hide_receipts_for = 3);

    let started = tokio::time::Instant::now();
    let outcome = ConfirmationWatcher::new()
        .wait(client, SENT_HASH, &pending)
        .await
        .unwrap();

    match outcome {
        WatchOutcome::Mined(receipt) => {
            assert!(receipt.success);
            assert_eq!(receipt.tx_hash, SENT_HASH);
        }
        other => panic!("expected mined, got {other:?}"),
    }
    assert_eq!(client.receipt_polls(), 4);
    assert!(started.elapsed() >= Duration::from_secs(12));
}

#[tokio::test(start_paused = true)]
async fn test_reports_other_replacement() {
    let (session, pending) = submitted(100).await;
    let client = session.client();
    client.mine_replacement(
        Some(address!("1111111111111111111111111111111111111111")),
        Bytes::from_static(&[0xde, 0xad]),
        U256::from(5),
    );

    let outcome = ConfirmationWatcher::new()
        .wait(client, SENT_HASH, &pending)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        WatchOutcome::Replaced {
            reason: ReplacementReason::Replaced,
            replacement: REPLACEMENT_HASH,
            receipt: client.with(|s| s.receipts[&REPLACEMENT_HASH]),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_times_out_with_error() {
    let (session, pending) = submitted(100).await;

    let err = ConfirmationWatcher::new()
        .with_timeout(Duration::from_secs(20))
        .with_poll_interval(Duration::from_secs(1))
        .wait(session.client(), SENT_HASH, &pending)
        .await
        .unwrap_err();

    match err {
        Error::ConfirmationTimeout { tx_hash, timeout_ms } => {
            assert_eq!(tx_hash, SENT_HASH);
            assert_eq!(timeout_ms, 20_000);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_waits_for_required_confirmations() {
    let (session, pending) = submitted(100).await;
    let client = session.client();
    client.mine(SENT_HASH, true);

    let watcher = ConfirmationWatcher::new()
        .with_confirmations(3)
        .with_timeout(Duration::from_secs(20));
    // head never moves past the inclusion block
    assert!(matches!(
        watcher.wait(client, SENT_HASH, &pending).await,
        Err(Error::ConfirmationTimeout { .. })
    ));

    client.with(|s| s.block += 2);
    assert!(matches!(
        watcher.wait(client, SENT_HASH, &pending).await,
        Ok(WatchOutcome::Mined(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_rpc_failures_only_end_at_the_timeout() {
    let (session, pending) = submitted(100).await;
    let client = session.client();
    client.mine(SENT_HASH, true);
    client.with(|s| s.receipt_failures = usize::MAX);

    let watcher = ConfirmationWatcher::new().with_timeout(Duration::from_secs(30));
    let started = tokio::time::Instant::now();
    let result = watcher.wait(client, SENT_HASH, &pending).await;

    assert!(matches!(result, Err(Error::ConfirmationTimeout { .. })));
    assert!(started.elapsed() >= Duration::from_secs(30));
    assert!(client.receipt_polls() > 1);
}
