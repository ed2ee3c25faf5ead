#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use chainboard_signing_core::amino::StdFee;
use chainboard_signing_core::catalog::type_urls;
use chainboard_signing_core::tx::tx_hash;
use chainboard_signing_core::{
    Action, ActionOrchestrator, ActionRequest, AminoSignResponse, AminoSigner, BaseAccount,
    BroadcastConfig, BroadcastResult, CheckTxResponse, Coin, DirectSignResponse, DirectSigner,
    Event, EventAttribute, GasConfig, MessageIntent, NodePort, PipelineConfig, PortError,
    Registry, StdPubKey, StdSignDoc, StdSignature, WalletAccount, WalletConnection,
};
use chainboard_signing_core::proto::cosmos::tx::v1beta1::SignDoc;
use tokio::sync::Notify;

pub const CHAIN_ID: &str = "chainboard-test-1";
pub const OWNER: &str = "chain1owner0000000000000000000000000000";
pub const PUB_KEY: [u8; 33] = [2; 33];

pub fn owner_account() -> WalletAccount {
    WalletAccount {
        address: OWNER.to_owned(),
        algo: "secp256k1".to_owned(),
        pub_key: PUB_KEY.to_vec(),
    }
}

pub fn pipeline_config() -> PipelineConfig {
    let mut config = PipelineConfig::new(
        CHAIN_ID,
        GasConfig::new("0.025uchain".parse().expect("gas price")),
    );
    config.broadcast = BroadcastConfig {
        timeout: Duration::from_secs(30),
        poll_interval: Duration::from_millis(500),
    };
    config
}

pub fn registry() -> Arc<Registry> {
    Arc::new(Registry::with_defaults())
}

pub fn create_entry_request() -> ActionRequest {
    serde_json::from_value(serde_json::json!({
        "action": "createEntry",
        "params": {
            "title": "Genesis",
            "metadataUri": "ipfs://genesis",
            "maxSupply": "100",
            "deposit": {"denom": "uchain", "amount": "1000000"}
        },
        "memo": "first entry"
    }))
    .expect("create entry request")
}

pub fn renew_request() -> ActionRequest {
    ActionRequest::new(Action::RenewIdentifier(
        chainboard_signing_core::actions::RenewIdentifierParams {
            name: "alice".to_owned(),
            periods: 2,
            deposit: None,
        },
    ))
}

pub fn send_intent() -> MessageIntent {
    MessageIntent::new(type_urls::MSG_SEND)
        .with("fromAddress", OWNER)
        .with("toAddress", "chain1recipient")
        .with("amount", vec![Coin::new(5u64, "uchain")])
}

pub fn created_entry_events(entry_id: &str) -> Vec<Event> {
    vec![Event {
        kind: "create_entry".to_owned(),
        attributes: vec![EventAttribute {
            key: "entry_id".to_owned(),
            value: entry_id.to_owned(),
        }],
    }]
}

/// Scripted node. Every call is counted; the sequence advances with each
/// accepted broadcast the way a real chain's would.
pub struct MockNode {
    account: Mutex<Option<BaseAccount>>,
    gas_used: Mutex<Option<u64>>,
    simulate_gate: Mutex<Option<Arc<Notify>>>,
    check_code: AtomicU64,
    inclusion: Mutex<Option<BroadcastResult>>,
    pub simulated: Mutex<Vec<Vec<u8>>>,
    pub broadcasts: Mutex<Vec<Vec<u8>>>,
    pub account_calls: AtomicU64,
    pub simulate_calls: AtomicU64,
    pub broadcast_calls: AtomicU64,
    pub query_calls: AtomicU64,
    pub chain_id_calls: AtomicU64,
}

impl MockNode {
    pub fn new() -> Self {
        Self {
            account: Mutex::new(Some(BaseAccount {
                address: OWNER.to_owned(),
                account_number: 7,
                sequence: 0,
                pub_key: None,
            })),
            gas_used: Mutex::new(Some(100_000)),
            simulate_gate: Mutex::new(None),
            check_code: AtomicU64::new(0),
            inclusion: Mutex::new(Some(BroadcastResult {
                code: 0,
                tx_hash: String::new(),
                raw_log: String::new(),
                events: Vec::new(),
                height: 42,
                gas_wanted: 150_000,
                gas_used: 98_000,
            })),
            simulated: Mutex::new(Vec::new()),
            broadcasts: Mutex::new(Vec::new()),
            account_calls: AtomicU64::new(0),
            simulate_calls: AtomicU64::new(0),
            broadcast_calls: AtomicU64::new(0),
            query_calls: AtomicU64::new(0),
            chain_id_calls: AtomicU64::new(0),
        }
    }

    pub fn without_account(self) -> Self {
        *self.account.lock().expect("lock") = None;
        self
    }

    pub fn with_gas_used(self, gas_used: Option<u64>) -> Self {
        *self.gas_used.lock().expect("lock") = gas_used;
        self
    }

    pub fn with_check_code(self, code: u32) -> Self {
        self.check_code.store(u64::from(code), Ordering::SeqCst);
        self
    }

    /// `None` keeps the transaction pending forever.
    pub fn with_inclusion(self, inclusion: Option<BroadcastResult>) -> Self {
        *self.inclusion.lock().expect("lock") = inclusion;
        self
    }

    pub fn with_events(self, events: Vec<Event>) -> Self {
        if let Some(result) = self.inclusion.lock().expect("lock").as_mut() {
            result.events = events;
        }
        self
    }

    pub fn with_result_code(self, code: u32, raw_log: &str) -> Self {
        if let Some(result) = self.inclusion.lock().expect("lock").as_mut() {
            result.code = code;
            result.raw_log = raw_log.to_owned();
        }
        self
    }

    /// Simulation blocks until the returned notifier fires.
    pub fn gate_simulation(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.simulate_gate.lock().expect("lock") = Some(Arc::clone(&gate));
        gate
    }

    pub fn sequence(&self) -> u64 {
        self.account
            .lock()
            .expect("lock")
            .as_ref()
            .map(|a| a.sequence)
            .unwrap_or_default()
    }

    pub fn calls(&self) -> u64 {
        self.account_calls.load(Ordering::SeqCst)
            + self.simulate_calls.load(Ordering::SeqCst)
            + self.broadcast_calls.load(Ordering::SeqCst)
            + self.query_calls.load(Ordering::SeqCst)
            + self.chain_id_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NodePort for MockNode {
    async fn chain_id(&self) -> Result<String, PortError> {
        self.chain_id_calls.fetch_add(1, Ordering::SeqCst);
        Ok(CHAIN_ID.to_owned())
    }

    async fn account(&self, _address: &str) -> Result<Option<BaseAccount>, PortError> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.account.lock().expect("lock").clone())
    }

    async fn simulate(&self, tx_bytes: Vec<u8>) -> Result<Option<u64>, PortError> {
        self.simulate_calls.fetch_add(1, Ordering::SeqCst);
        self.simulated.lock().expect("lock").push(tx_bytes);
        let gate = self.simulate_gate.lock().expect("lock").clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(*self.gas_used.lock().expect("lock"))
    }

    async fn broadcast_tx_sync(&self, tx_bytes: Vec<u8>) -> Result<CheckTxResponse, PortError> {
        self.broadcast_calls.fetch_add(1, Ordering::SeqCst);
        let hash = tx_hash(&tx_bytes);
        self.broadcasts.lock().expect("lock").push(tx_bytes);
        let code = self.check_code.load(Ordering::SeqCst) as u32;
        if code == 0 {
            if let Some(account) = self.account.lock().expect("lock").as_mut() {
                account.sequence += 1;
            }
        }
        Ok(CheckTxResponse {
            code,
            tx_hash: hash,
            raw_log: if code == 0 {
                String::new()
            } else {
                "insufficient fees".to_owned()
            },
        })
    }

    async fn query_tx(&self, tx_hash: &str) -> Result<Option<BroadcastResult>, PortError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.inclusion.lock().expect("lock").clone().map(|mut result| {
            result.tx_hash = tx_hash.to_owned();
            result
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletKind {
    Direct,
    AminoOnly,
    Both,
    Neither,
}

/// In-memory wallet. Signs with a fixed 64-byte signature and echoes the
/// document back unless a fee override is configured.
pub struct MockWallet {
    kind: WalletKind,
    reject: bool,
    fee_override: Mutex<Option<StdFee>>,
    pub direct_docs: Mutex<Vec<SignDoc>>,
    pub amino_docs: Mutex<Vec<StdSignDoc>>,
    pub account_calls: AtomicU64,
}

impl MockWallet {
    pub fn new(kind: WalletKind) -> Self {
        Self {
            kind,
            reject: false,
            fee_override: Mutex::new(None),
            direct_docs: Mutex::new(Vec::new()),
            amino_docs: Mutex::new(Vec::new()),
            account_calls: AtomicU64::new(0),
        }
    }

    pub fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    pub fn with_fee_override(self, fee: StdFee) -> Self {
        *self.fee_override.lock().expect("lock") = Some(fee);
        self
    }

    fn signature() -> StdSignature {
        StdSignature {
            pub_key: StdPubKey {
                kind: "tendermint/PubKeySecp256k1".to_owned(),
                value: BASE64.encode(PUB_KEY),
            },
            signature: BASE64.encode([7u8; 64]),
        }
    }
}

#[async_trait]
impl WalletConnection for MockWallet {
    async fn accounts(&self) -> Result<Vec<WalletAccount>, PortError> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![owner_account()])
    }

    fn as_direct(&self) -> Option<&dyn DirectSigner> {
        match self.kind {
            WalletKind::Direct | WalletKind::Both => Some(self),
            _ => None,
        }
    }

    fn as_amino(&self) -> Option<&dyn AminoSigner> {
        match self.kind {
            WalletKind::AminoOnly | WalletKind::Both => Some(self),
            _ => None,
        }
    }
}

#[async_trait]
impl DirectSigner for MockWallet {
    async fn sign_direct(
        &self,
        _signer_address: &str,
        sign_doc: SignDoc,
    ) -> Result<DirectSignResponse, PortError> {
        if self.reject {
            return Err(PortError::Rejected("user denied the request".to_owned()));
        }
        self.direct_docs.lock().expect("lock").push(sign_doc.clone());
        Ok(DirectSignResponse {
            signed: sign_doc,
            signature: Self::signature(),
        })
    }
}

#[async_trait]
impl AminoSigner for MockWallet {
    async fn sign_amino(
        &self,
        _signer_address: &str,
        sign_doc: StdSignDoc,
    ) -> Result<AminoSignResponse, PortError> {
        if self.reject {
            return Err(PortError::Rejected("user denied the request".to_owned()));
        }
        self.amino_docs.lock().expect("lock").push(sign_doc.clone());
        let mut signed = sign_doc;
        if let Some(fee) = self.fee_override.lock().expect("lock").clone() {
            signed.fee = fee;
        }
        Ok(AminoSignResponse {
            signed,
            signature: Self::signature(),
        })
    }
}

pub type TestOrchestrator = ActionOrchestrator<Arc<MockNode>, Arc<MockWallet>>;

pub fn new_orchestrator(node: MockNode, wallet: MockWallet) -> (TestOrchestrator, Arc<MockNode>, Arc<MockWallet>) {
    let node = Arc::new(node);
    let wallet = Arc::new(wallet);
    let orchestrator = ActionOrchestrator::new(
        registry(),
        Arc::clone(&node),
        Arc::clone(&wallet),
        pipeline_config(),
    );
    (orchestrator, node, wallet)
}
