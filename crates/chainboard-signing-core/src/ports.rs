use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::amino::StdSignDoc;
use crate::domain::{BaseAccount, BroadcastResult, CheckTxResponse, WalletAccount};
use crate::proto::cosmos::tx::v1beta1::SignDoc;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("policy error: {0}")]
    Policy(String),
}

/// Node endpoints used by the pipeline.
#[async_trait]
pub trait NodePort: Send + Sync {
    async fn chain_id(&self) -> Result<String, PortError>;
    /// `Ok(None)` when the chain has never seen the address.
    async fn account(&self, address: &str) -> Result<Option<BaseAccount>, PortError>;
    /// Gas used by the simulated transaction, if the node reported one.
    async fn simulate(&self, tx_bytes: Vec<u8>) -> Result<Option<u64>, PortError>;
    async fn broadcast_tx_sync(&self, tx_bytes: Vec<u8>) -> Result<CheckTxResponse, PortError>;
    /// `Ok(None)` while the transaction is not yet included.
    async fn query_tx(&self, tx_hash: &str) -> Result<Option<BroadcastResult>, PortError>;
}

#[async_trait]
impl<T: NodePort + ?Sized> NodePort for Arc<T> {
    async fn chain_id(&self) -> Result<String, PortError> {
        (**self).chain_id().await
    }

    async fn account(&self, address: &str) -> Result<Option<BaseAccount>, PortError> {
        (**self).account(address).await
    }

    async fn simulate(&self, tx_bytes: Vec<u8>) -> Result<Option<u64>, PortError> {
        (**self).simulate(tx_bytes).await
    }

    async fn broadcast_tx_sync(&self, tx_bytes: Vec<u8>) -> Result<CheckTxResponse, PortError> {
        (**self).broadcast_tx_sync(tx_bytes).await
    }

    async fn query_tx(&self, tx_hash: &str) -> Result<Option<BroadcastResult>, PortError> {
        (**self).query_tx(tx_hash).await
    }
}

/// Public key as wallets transport it: type tag plus base64 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdPubKey {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// Signature as wallets transport it (base64).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    pub pub_key: StdPubKey,
    pub signature: String,
}

/// The wallet may return a sign doc that differs from the request (for
/// example with a user-edited fee); the signature covers `signed`.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectSignResponse {
    pub signed: SignDoc,
    pub signature: StdSignature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AminoSignResponse {
    pub signed: StdSignDoc,
    pub signature: StdSignature,
}

#[async_trait]
pub trait DirectSigner: Send + Sync {
    async fn sign_direct(
        &self,
        signer_address: &str,
        sign_doc: SignDoc,
    ) -> Result<DirectSignResponse, PortError>;
}

#[async_trait]
pub trait AminoSigner: Send + Sync {
    async fn sign_amino(
        &self,
        signer_address: &str,
        sign_doc: StdSignDoc,
    ) -> Result<AminoSignResponse, PortError>;
}

/// A connected wallet. Signing capabilities are exposed through the
/// `as_*` accessors and probed once per attempt by
/// [`classify`](crate::capability::classify).
#[async_trait]
pub trait WalletConnection: Send + Sync {
    async fn accounts(&self) -> Result<Vec<WalletAccount>, PortError>;

    fn as_direct(&self) -> Option<&dyn DirectSigner> {
        None
    }

    fn as_amino(&self) -> Option<&dyn AminoSigner> {
        None
    }
}

#[async_trait]
impl<T: WalletConnection + ?Sized> WalletConnection for Arc<T> {
    async fn accounts(&self) -> Result<Vec<WalletAccount>, PortError> {
        (**self).accounts().await
    }

    fn as_direct(&self) -> Option<&dyn DirectSigner> {
        (**self).as_direct()
    }

    fn as_amino(&self) -> Option<&dyn AminoSigner> {
        (**self).as_amino()
    }
}
