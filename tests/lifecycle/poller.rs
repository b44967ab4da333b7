//! Indexer poller backoff behaviour

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::address;
use safe_creation::{cancel_pair, BackoffPolicy, Error, IndexerPoller, PollEvent, PollTask};
use tokio::sync::mpsc;

use crate::mock::MockIndexer;

const SAFE: alloy::primitives::Address = address!("a6B71E26C5e0845f74c812102Ca7114b6a896AB2");

#[tokio::test(start_paused = true)]
async fn test_resolves_on_last_attempt() {
    let indexer = MockIndexer::found_on(19);
    let policy = BackoffPolicy::default();

    let info = IndexerPoller::new(&indexer, policy)
        .poll(100, SAFE)
        .await
        .unwrap();

    assert_eq!(info.address.value, SAFE);
    assert_eq!(indexer.calls(), 19);
}

#[tokio::test(start_paused = true)]
async fn test_exhausts_after_full_schedule() {
    let indexer = MockIndexer::never();
    let policy = BackoffPolicy::default();

    let started = tokio::time::Instant::now();
    let err = IndexerPoller::new(&indexer, policy.clone())
        .poll(100, SAFE)
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, Error::IndexerTimeout { address, attempts: 19 } if address == SAFE));
    assert_eq!(indexer.calls(), 19);
    assert!(elapsed >= policy.total_delay());
    assert!(elapsed >= Duration::from_millis(283_250));
    assert!(elapsed < Duration::from_secs(5 * 60));
}

#[tokio::test(start_paused = true)]
async fn test_reports_progress_events() {
    let indexer = MockIndexer::found_on(3);
    let (tx, mut rx) = mpsc::unbounded_channel();

    IndexerPoller::new(&indexer, BackoffPolicy::default())
        .with_events(tx)
        .poll(100, SAFE)
        .await
        .unwrap();

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    assert_eq!(
        events,
        vec![
            PollEvent::Attempt { attempt: 1, max_attempts: 19 },
            PollEvent::NotIndexed {
                attempt: 1,
                next_delay: Duration::from_millis(750),
                reason: "safe not indexed yet".to_string(),
            },
            PollEvent::Attempt { attempt: 2, max_attempts: 19 },
            PollEvent::NotIndexed {
                attempt: 2,
                next_delay: Duration::from_millis(1_500),
                reason: "safe not indexed yet".to_string(),
            },
            PollEvent::Attempt { attempt: 3, max_attempts: 19 },
            PollEvent::Indexed { attempt: 3 },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_polling() {
    let indexer = MockIndexer::never();
    let (handle, token) = cancel_pair();

    let poll = IndexerPoller::new(&indexer, BackoffPolicy::default())
        .with_cancel(token);
    let cancel_later = async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        handle.cancel();
    };
    let (result, ()) = tokio::join!(poll.poll(100, SAFE), cancel_later);

    assert!(matches!(result, Err(Error::Cancelled)));
    // attempts at 0s, 0.75s and 2.25s; the fourth would start at 5.25s
    assert_eq!(indexer.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_spawned_task_streams_events() {
    let indexer = Arc::new(MockIndexer::found_on(2));
    let (_handle, token) = cancel_pair();

    let mut task = PollTask::spawn(indexer.clone(), BackoffPolicy::default(), token, 100, SAFE);
    assert_eq!(
        task.events.recv().await,
        Some(PollEvent::Attempt { attempt: 1, max_attempts: 19 })
    );

    let info = task.join().await.unwrap();
    assert_eq!(info.address.value, SAFE);
    assert_eq!(indexer.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_aborted_task_is_cancelled() {
    let indexer = Arc::new(MockIndexer::never());
    let task = PollTask::spawn(
        indexer,
        BackoffPolicy::default(),
        safe_creation::CancelToken::never(),
        100,
        SAFE,
    );
    task.abort();
    assert!(matches!(task.join().await, Err(Error::Cancelled)));
}
