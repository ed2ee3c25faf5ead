mod common;

use std::sync::atomic::Ordering;

use chainboard_signing_core::amino::StdFee;
use chainboard_signing_core::proto::cosmos::tx::signing::v1beta1::SignMode;
use chainboard_signing_core::proto::cosmos::tx::v1beta1::mode_info::Sum;
use chainboard_signing_core::proto::cosmos::tx::v1beta1::{AuthInfo, TxBody, TxRaw};
use chainboard_signing_core::{
    ActorState, AminoSigningClient, Coin, DirectSigningPipeline, Fee, FeeSetting, SigningError,
    TxOutcome,
};
use common::{
    create_entry_request, created_entry_events, new_orchestrator, owner_account,
    pipeline_config, registry, renew_request, send_intent, MockNode, MockWallet, WalletKind,
};
use prost::Message;

fn sign_mode(auth_info: &AuthInfo) -> i32 {
    match auth_info.signer_infos[0]
        .mode_info
        .as_ref()
        .and_then(|m| m.sum.clone())
    {
        Some(Sum::Single(single)) => single.mode,
        None => panic!("signer mode missing"),
    }
}

fn decode_broadcast(node: &MockNode, index: usize) -> (TxBody, AuthInfo, TxRaw) {
    let broadcasts = node.broadcasts.lock().expect("lock");
    let tx = TxRaw::decode(broadcasts[index].as_slice()).expect("tx raw");
    let body = TxBody::decode(tx.body_bytes.as_slice()).expect("body");
    let auth_info = AuthInfo::decode(tx.auth_info_bytes.as_slice()).expect("auth info");
    (body, auth_info, tx)
}

#[tokio::test]
async fn direct_wallet_runs_full_pipeline_and_extracts_identifier() {
    let (orch, node, wallet) = new_orchestrator(
        MockNode::new().with_events(created_entry_events("42")),
        MockWallet::new(WalletKind::Direct),
    );

    let outcome = orch.invoke(create_entry_request()).await.expect("invoke");
    assert_eq!(outcome.identifier.as_deref(), Some("42"));
    assert_eq!(outcome.result.code, 0);
    assert_eq!(orch.state(), ActorState::Idle);

    assert_eq!(node.simulate_calls.load(Ordering::SeqCst), 1);
    assert_eq!(node.broadcast_calls.load(Ordering::SeqCst), 1);
    // Once for simulation, once right before the sign doc.
    assert_eq!(node.account_calls.load(Ordering::SeqCst), 2);

    let docs = wallet.direct_docs.lock().expect("lock");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].chain_id, common::CHAIN_ID);
    assert_eq!(docs[0].account_number, 7);
    drop(docs);

    let (body, auth_info, tx) = decode_broadcast(&node, 0);
    assert_eq!(body.memo, "first entry");
    assert_eq!(body.messages[0].type_url, "/chainboard.registry.v1.MsgCreateEntry");
    assert_eq!(sign_mode(&auth_info), SignMode::Direct as i32);
    let fee = auth_info.fee.expect("fee");
    assert_eq!(fee.gas_limit, 150_000);
    assert_eq!(fee.amount[0].amount, "3750");
    assert_eq!(tx.signatures, vec![vec![7u8; 64]]);
    assert_eq!(outcome.result.tx_hash, chainboard_signing_core::tx::tx_hash(&tx.encode_to_vec()));
}

#[tokio::test]
async fn amino_only_wallet_signs_legacy_json() {
    let (orch, node, wallet) = new_orchestrator(
        MockNode::new().with_events(created_entry_events("9")),
        MockWallet::new(WalletKind::AminoOnly),
    );

    let outcome = orch.invoke(create_entry_request()).await.expect("invoke");
    assert_eq!(outcome.identifier.as_deref(), Some("9"));
    // Fee was estimated once by the orchestrator and reused.
    assert_eq!(node.simulate_calls.load(Ordering::SeqCst), 1);

    let docs = wallet.amino_docs.lock().expect("lock");
    assert_eq!(docs[0].msgs[0].kind, "registry/CreateEntry");
    assert_eq!(docs[0].msgs[0].value["max_supply"], "100");
    assert_eq!(docs[0].fee.gas, 150_000);
    drop(docs);

    let (_, auth_info, _) = decode_broadcast(&node, 0);
    assert_eq!(sign_mode(&auth_info), SignMode::LegacyAminoJson as i32);
}

#[tokio::test]
async fn wallet_offering_both_modes_uses_direct() {
    let (orch, _node, wallet) =
        new_orchestrator(MockNode::new(), MockWallet::new(WalletKind::Both));
    orch.invoke(renew_request()).await.expect("invoke");
    assert_eq!(wallet.direct_docs.lock().expect("lock").len(), 1);
    assert!(wallet.amino_docs.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn unsupported_signer_fails_before_any_node_call() {
    let (orch, node, wallet) =
        new_orchestrator(MockNode::new(), MockWallet::new(WalletKind::Neither));
    let err = orch.invoke(renew_request()).await.expect_err("unsupported");
    assert!(matches!(err, SigningError::UnsupportedSigner));
    assert_eq!(err.outcome(), TxOutcome::NotApplied);
    assert_eq!(node.calls(), 0);
    assert_eq!(wallet.account_calls.load(Ordering::SeqCst), 0);
    assert_eq!(orch.state(), ActorState::Idle);
}

#[tokio::test]
async fn second_invoke_while_in_flight_is_busy() {
    let node = MockNode::new();
    let gate = node.gate_simulation();
    let (orch, node, _wallet) = new_orchestrator(node, MockWallet::new(WalletKind::Direct));

    let first = orch.invoke(renew_request());
    let second = async {
        while node.simulate_calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(orch.state(), ActorState::InFlight);
        let busy = orch.invoke(renew_request()).await;
        let account_calls = node.account_calls.load(Ordering::SeqCst);
        gate.notify_one();
        (busy, account_calls)
    };

    let (first, (busy, account_calls_during_flight)) = tokio::join!(first, second);
    first.expect("first invoke");
    assert!(matches!(busy, Err(SigningError::Busy)));
    assert_eq!(account_calls_during_flight, 1);
    assert_eq!(node.broadcast_calls.load(Ordering::SeqCst), 1);
    assert_eq!(orch.state(), ActorState::Idle);
}

#[tokio::test]
async fn on_chain_failure_is_surfaced_without_resend() {
    let (orch, node, _wallet) = new_orchestrator(
        MockNode::new().with_result_code(5, "insufficient funds"),
        MockWallet::new(WalletKind::Direct),
    );
    let err = orch.invoke(renew_request()).await.expect_err("code 5");
    match &err {
        SigningError::OnChainExecutionFailure { code, raw_log, .. } => {
            assert_eq!(*code, 5);
            assert_eq!(raw_log, "insufficient funds");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(err.outcome(), TxOutcome::AppliedAndRejected);
    assert_eq!(node.broadcast_calls.load(Ordering::SeqCst), 1);
    assert_eq!(orch.state(), ActorState::Idle);
}

#[tokio::test]
async fn check_tx_rejection_is_not_applied() {
    let (orch, node, _wallet) = new_orchestrator(
        MockNode::new().with_check_code(32),
        MockWallet::new(WalletKind::Direct),
    );
    let err = orch.invoke(renew_request()).await.expect_err("check tx");
    assert!(matches!(err, SigningError::BroadcastRejected { code: 32, .. }));
    assert_eq!(err.outcome(), TxOutcome::NotApplied);
    assert_eq!(orch.state(), ActorState::Idle);
    assert_eq!(node.query_calls.load(Ordering::SeqCst), 0);
    assert_eq!(node.broadcast_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn missing_inclusion_times_out_as_ambiguous() {
    let (orch, node, _wallet) = new_orchestrator(
        MockNode::new().with_inclusion(None),
        MockWallet::new(WalletKind::Direct),
    );
    let err = orch.invoke(renew_request()).await.expect_err("timeout");
    assert!(matches!(err, SigningError::BroadcastTimeout { .. }));
    assert_eq!(err.outcome(), TxOutcome::Ambiguous);
    assert!(node.query_calls.load(Ordering::SeqCst) > 1);
    assert_eq!(node.broadcast_calls.load(Ordering::SeqCst), 1);
    assert_eq!(orch.state(), ActorState::Idle);
}

#[tokio::test]
async fn every_attempt_reads_a_fresh_sequence() {
    let (orch, node, _wallet) =
        new_orchestrator(MockNode::new(), MockWallet::new(WalletKind::Direct));
    orch.invoke(renew_request()).await.expect("first");
    orch.invoke(renew_request()).await.expect("second");

    assert_eq!(node.account_calls.load(Ordering::SeqCst), 4);
    let (_, first, _) = decode_broadcast(&node, 0);
    let (_, second, _) = decode_broadcast(&node, 1);
    assert_eq!(first.signer_infos[0].sequence, 0);
    assert_eq!(second.signer_infos[0].sequence, 1);
}

#[tokio::test]
async fn rejected_signature_releases_guard_and_skips_broadcast() {
    let (orch, node, _wallet) = new_orchestrator(
        MockNode::new(),
        MockWallet::new(WalletKind::Direct).rejecting(),
    );
    let err = orch.invoke(renew_request()).await.expect_err("rejected");
    assert!(matches!(err, SigningError::SigningRejected(_)));
    assert_eq!(err.outcome(), TxOutcome::NotApplied);
    assert_eq!(node.broadcast_calls.load(Ordering::SeqCst), 0);
    assert_eq!(orch.state(), ActorState::Idle);

    // Guard is free again: the next attempt reaches the wallet.
    let err = orch.invoke(renew_request()).await.expect_err("rejected again");
    assert!(matches!(err, SigningError::SigningRejected(_)));
}

#[tokio::test]
async fn simulation_failure_aborts_before_signing() {
    let (orch, node, wallet) = new_orchestrator(
        MockNode::new().with_gas_used(None),
        MockWallet::new(WalletKind::Direct),
    );
    let err = orch.invoke(renew_request()).await.expect_err("simulation");
    assert!(matches!(err, SigningError::SimulationFailed(_)));
    assert!(wallet.direct_docs.lock().expect("lock").is_empty());
    assert_eq!(node.broadcast_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn direct_and_amino_paths_produce_the_same_body() {
    let registry = registry();
    let config = pipeline_config();
    let node = MockNode::new();
    let wallet = MockWallet::new(WalletKind::Both);
    let fee = Fee {
        amount: vec![Coin::new(3750u64, "uchain")],
        gas_limit: 150_000,
    };
    let messages = vec![send_intent()];

    let direct = DirectSigningPipeline::new(&registry.messages, &node, &wallet, &config)
        .sign(&owner_account(), &messages, &fee, "memo", Some(500))
        .await
        .expect("direct");
    let amino = AminoSigningClient::new(&registry, &node, &wallet, &config)
        .sign(
            &owner_account(),
            &messages,
            FeeSetting::Explicit(fee.clone()),
            "memo",
            Some(500),
        )
        .await
        .expect("amino");

    assert_eq!(direct.tx_raw.body_bytes, amino.tx_raw.body_bytes);
    let direct_auth = AuthInfo::decode(direct.tx_raw.auth_info_bytes.as_slice()).expect("auth");
    let amino_auth = AuthInfo::decode(amino.tx_raw.auth_info_bytes.as_slice()).expect("auth");
    assert_eq!(direct_auth.fee, amino_auth.fee);
    assert_eq!(
        direct_auth.signer_infos[0].public_key,
        amino_auth.signer_infos[0].public_key
    );
    assert_ne!(sign_mode(&direct_auth), sign_mode(&amino_auth));
}

#[tokio::test]
async fn amino_path_honors_wallet_modified_fee() {
    let registry = registry();
    let config = pipeline_config();
    let node = MockNode::new();
    let wallet = MockWallet::new(WalletKind::AminoOnly).with_fee_override(StdFee {
        amount: vec![Coin::new(5000u64, "uchain")],
        gas: 200_000,
    });

    let signed = AminoSigningClient::new(&registry, &node, &wallet, &config)
        .sign(
            &owner_account(),
            &[send_intent()],
            FeeSetting::Auto,
            "",
            None,
        )
        .await
        .expect("amino");

    // Requested fee came from simulation; the wallet's edit wins.
    assert_eq!(wallet.amino_docs.lock().expect("lock")[0].fee.gas, 150_000);
    let auth_info = AuthInfo::decode(signed.tx_raw.auth_info_bytes.as_slice()).expect("auth");
    let fee = auth_info.fee.expect("fee");
    assert_eq!(fee.gas_limit, 200_000);
    assert_eq!(fee.amount[0].amount, "5000");
    assert_eq!(node.simulate_calls.load(Ordering::SeqCst), 1);
}
