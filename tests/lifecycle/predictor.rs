//! Address prediction and submission capture

use alloy::primitives::{Address, U256};
use safe_creation::{
    encode_safe_creation_tx, estimate_creation_gas, predict_safe_address, submit_creation_tx,
    ContractRegistry, Error, SafeCreationParams, SafeVersion, SessionSlot,
};

use crate::mock::{params, session, ACCOUNT, OWNER_B, SENT_HASH, START_BLOCK, START_NONCE};

#[tokio::test]
async fn test_prediction_is_deterministic() {
    let session = session(100).await;
    let p = params(1);

    let first = predict_safe_address(&session, &p).await.unwrap();
    let second = predict_safe_address(&session, &p).await.unwrap();
    assert_eq!(first, second);
    assert_ne!(first, Address::ZERO);
    assert!(session.client().sent().is_empty(), "prediction must not send anything");

    let other_salt = predict_safe_address(&session, &params(2)).await.unwrap();
    assert_ne!(first, other_salt);
}

#[tokio::test]
async fn test_prediction_depends_on_chain_singleton() {
    // mainnet uses the L1 singleton, gnosis the L2 one
    let mainnet = predict_safe_address(&session(1).await, &params(1)).await.unwrap();
    let gnosis = predict_safe_address(&session(100).await, &params(1)).await.unwrap();
    assert_ne!(mainnet, gnosis);
}

#[tokio::test]
async fn test_prediction_without_session_is_no_provider() {
    let slot = SessionSlot::<crate::mock::MockChain>::new();
    let err = slot.predict_address(&params(1)).await.unwrap_err();
    assert!(matches!(err, Error::NoProvider));
}

#[tokio::test]
async fn test_slot_disconnect_drops_session() {
    let mut slot = SessionSlot::new();
    slot.connect(session(100).await);
    assert!(slot.predict_address(&params(1)).await.is_ok());

    assert!(slot.disconnect().is_some());
    assert!(!slot.is_connected());
    assert!(matches!(slot.predict_address(&params(1)).await, Err(Error::NoProvider)));
}

#[tokio::test]
async fn test_invalid_threshold_rejected_before_network() {
    let session = session(100).await;
    let err = SafeCreationParams::new(vec![ACCOUNT, OWNER_B], 3, U256::ZERO).unwrap_err();
    assert!(matches!(err, Error::InvalidThreshold { threshold: 3, owners: 2 }));
    assert_eq!(session.client().eth_calls(), 0);
}

#[tokio::test]
async fn test_unknown_chain_fails_to_connect() {
    let err = safe_creation::SafeSession::connect(
        crate::mock::MockChain::new(999_999),
        ContractRegistry::with_defaults(),
        SafeVersion::V1_3_0,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::UnsupportedChain(999_999)));
}

#[tokio::test]
async fn test_submission_captures_pending_tx() {
    let session = session(100).await;
    let p = params(5);

    let submission = submit_creation_tx(&session, &p).await.unwrap();
    assert_eq!(submission.tx_hash, SENT_HASH);

    let expected = encode_safe_creation_tx(
        &p,
        session.registry(),
        session.chain_id(),
        session.version(),
    )
    .unwrap();
    let pending = submission.pending;
    assert_eq!(pending.data, expected.data);
    assert_eq!(pending.to, expected.to);
    assert_eq!(pending.from, ACCOUNT);
    assert_eq!(pending.nonce, START_NONCE);
    assert_eq!(pending.start_block, START_BLOCK);
    assert!(pending.value.is_zero());

    let sent = session.client().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].nonce, Some(START_NONCE));
    assert_eq!(sent[0].data, expected.data);
}

#[tokio::test]
async fn test_gas_estimate() {
    let session = session(100).await;
    assert_eq!(estimate_creation_gas(&session, &params(1)).await.unwrap(), 262_000);
}
