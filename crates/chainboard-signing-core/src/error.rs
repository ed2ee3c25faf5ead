use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::ports::PortError;

/// Failures of the binary and amino message codecs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unregistered message type: {0}")]
    Unregistered(String),
    #[error("missing field: {0}")]
    MissingField(String),
    #[error("field {field}: expected {expected}, found {found}")]
    WrongKind {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("field {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("protobuf decode failed for {type_url}: {reason}")]
    Decode { type_url: String, reason: String },
    #[error("malformed amino message: {0}")]
    Amino(String),
}

/// What an invocation means for the chain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TxOutcome {
    /// Included in a block and executed successfully.
    Applied,
    /// Failed before broadcast or refused by CheckTx; nothing reached a block.
    NotApplied,
    /// Broadcast was requested but inclusion was never observed.
    Ambiguous,
    /// Included in a block and rejected by chain logic.
    AppliedAndRejected,
}

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("unregistered message type: {0}")]
    UnregisteredMessageType(String),
    #[error("connected wallet exposes neither direct nor amino signing")]
    UnsupportedSigner,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("account query failed for {address}: {reason}")]
    AccountQueryFailed { address: String, reason: String },
    #[error("public key derivation failed: {0}")]
    PubkeyDerivationFailed(String),
    #[error("simulation failed: {0}")]
    SimulationFailed(String),
    #[error("signing rejected: {0}")]
    SigningRejected(String),
    #[error("encoding failed: {0}")]
    EncodingFailed(String),
    #[error("broadcast failed, outcome unknown: {0}")]
    BroadcastFailed(String),
    #[error("no confirmation for tx {tx_hash} within {timeout:?}; it may still be included")]
    BroadcastTimeout { tx_hash: String, timeout: Duration },
    /// CheckTx refused the tx; it never entered the mempool.
    #[error("tx {tx_hash} rejected by the node with code {code}: {raw_log}")]
    BroadcastRejected {
        code: u32,
        raw_log: String,
        tx_hash: String,
    },
    #[error("tx {tx_hash} failed on chain with code {code}: {raw_log}")]
    OnChainExecutionFailure {
        code: u32,
        raw_log: String,
        tx_hash: String,
    },
    #[error("a transaction is already in flight for this account")]
    Busy,
}

impl SigningError {
    pub fn outcome(&self) -> TxOutcome {
        match self {
            SigningError::BroadcastFailed(_) | SigningError::BroadcastTimeout { .. } => {
                TxOutcome::Ambiguous
            }
            SigningError::OnChainExecutionFailure { .. } => TxOutcome::AppliedAndRejected,
            _ => TxOutcome::NotApplied,
        }
    }

    pub(crate) fn account_query(address: &str, err: impl ToString) -> Self {
        SigningError::AccountQueryFailed {
            address: address.to_owned(),
            reason: err.to_string(),
        }
    }

    /// Maps a wallet-side failure of a signature request.
    pub(crate) fn from_signer(err: PortError) -> Self {
        match err {
            PortError::Rejected(reason) => SigningError::SigningRejected(reason),
            PortError::Validation(reason) => SigningError::EncodingFailed(reason),
            other => SigningError::SigningRejected(other.to_string()),
        }
    }
}

impl From<CodecError> for SigningError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Unregistered(type_url) => SigningError::UnregisteredMessageType(type_url),
            other => SigningError::EncodingFailed(other.to_string()),
        }
    }
}
