pub mod actions;
pub mod amino;
pub mod amino_client;
pub mod broadcast;
pub mod capability;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod direct;
pub mod domain;
pub mod error;
pub mod events;
pub mod fee;
pub mod orchestrator;
pub mod ports;
pub mod proto;
pub mod registry;
pub mod state_machine;
pub mod tx;

pub use actions::{Action, ActionRequest};
pub use amino::{AminoCodecRegistry, AminoMsg, StdFee, StdSignDoc};
pub use amino_client::{AminoSigningClient, FeeSetting};
pub use broadcast::Broadcaster;
pub use capability::{classify, SignerCapability};
pub use codec::{MessageCodecRegistry, ProstCodec};
pub use config::{BroadcastConfig, PipelineConfig, PubKeyType};
pub use direct::{DirectSigningPipeline, SignedTx};
pub use domain::{
    BaseAccount, BroadcastResult, CheckTxResponse, Coin, Event, EventAttribute, Fee, FieldValue,
    Fields, MessageIntent, WalletAccount,
};
pub use error::{CodecError, SigningError, TxOutcome};
pub use events::{extract, EventSelector};
pub use fee::{FeeEstimator, GasAdjustment, GasConfig, GasPrice};
pub use orchestrator::{ActionOrchestrator, ActionOutcome};
pub use ports::{
    AminoSignResponse, AminoSigner, DirectSignResponse, DirectSigner, NodePort, PortError,
    StdPubKey, StdSignature, WalletConnection,
};
pub use registry::Registry;
pub use state_machine::{ActorState, InFlightGuard, StateTransition};
