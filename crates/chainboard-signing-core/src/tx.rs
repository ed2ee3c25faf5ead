//! Transaction assembly shared by the simulation and both signing paths.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use prost::Message;
use sha2::{Digest, Sha256};

use crate::config::PubKeyType;
use crate::domain::{BaseAccount, Fee, Signature, WalletAccount};
use crate::error::SigningError;
use crate::ports::{NodePort, StdSignature};
use crate::proto::cosmos::crypto::secp256k1::PubKey;
use crate::proto::cosmos::tx::signing::v1beta1::SignMode;
use crate::proto::cosmos::tx::v1beta1::mode_info::{Single, Sum};
use crate::proto::cosmos::tx::v1beta1::{AuthInfo, ModeInfo, SignerInfo, TxBody, TxRaw};
use crate::proto::google::protobuf::Any;

const COMPRESSED_PUB_KEY_LEN: usize = 33;

pub fn tx_body_and_bytes(
    messages: Vec<Any>,
    memo: &str,
    timeout_height: Option<u64>,
) -> (TxBody, Vec<u8>) {
    let body = TxBody {
        messages,
        memo: memo.to_owned(),
        timeout_height: timeout_height.unwrap_or_default(),
    };
    let bytes = body.encode_to_vec();
    (body, bytes)
}

pub fn signer_info(public_key: Any, sequence: u64, mode: SignMode) -> SignerInfo {
    SignerInfo {
        public_key: Some(public_key),
        mode_info: Some(ModeInfo {
            sum: Some(Sum::Single(Single { mode: mode as i32 })),
        }),
        sequence,
    }
}

pub fn auth_info_and_bytes(signer_info: SignerInfo, fee: &Fee) -> (AuthInfo, Vec<u8>) {
    let auth_info = AuthInfo {
        signer_infos: vec![signer_info],
        fee: Some(fee.to_proto()),
    };
    let bytes = auth_info.encode_to_vec();
    (auth_info, bytes)
}

/// Wraps a compressed public key in the type-tagged form the chain expects.
pub fn encode_pub_key(key: &[u8], type_url: &str) -> Result<Any, SigningError> {
    if key.len() != COMPRESSED_PUB_KEY_LEN {
        return Err(SigningError::PubkeyDerivationFailed(format!(
            "expected a {COMPRESSED_PUB_KEY_LEN}-byte compressed key, got {} bytes",
            key.len()
        )));
    }
    Ok(Any {
        type_url: type_url.to_owned(),
        value: PubKey { key: key.to_vec() }.encode_to_vec(),
    })
}

/// Public key for the signer info. The on-chain key wins when the account
/// already has one; fresh accounts fall back to the key the wallet reports.
pub fn resolve_pub_key(
    account: &BaseAccount,
    wallet: &WalletAccount,
    pub_key_type: PubKeyType,
) -> Result<Any, SigningError> {
    match &account.pub_key {
        Some(on_chain) => {
            if !wallet.pub_key.is_empty() && wallet.pub_key != on_chain.key {
                return Err(SigningError::PubkeyDerivationFailed(format!(
                    "wallet key for {} does not match the key recorded on chain",
                    account.address
                )));
            }
            encode_pub_key(&on_chain.key, &on_chain.type_url)
        }
        None if wallet.pub_key.is_empty() => Err(SigningError::PubkeyDerivationFailed(format!(
            "no public key known for {}",
            account.address
        ))),
        None => encode_pub_key(&wallet.pub_key, pub_key_type.type_url()),
    }
}

/// Fresh account state; never cached between attempts.
pub async fn fetch_account<N: NodePort + ?Sized>(
    node: &N,
    address: &str,
) -> Result<BaseAccount, SigningError> {
    node.account(address)
        .await
        .map_err(|e| SigningError::account_query(address, e))?
        .ok_or_else(|| SigningError::account_query(address, "account does not exist on chain"))
}

/// Normalizes a wallet signature to raw bytes.
pub fn decode_signature(signature: &StdSignature) -> Result<Signature, SigningError> {
    let pub_key = BASE64
        .decode(&signature.pub_key.value)
        .map_err(|e| SigningError::EncodingFailed(format!("signature pub_key: {e}")))?;
    let signature = BASE64
        .decode(&signature.signature)
        .map_err(|e| SigningError::EncodingFailed(format!("signature bytes: {e}")))?;
    if signature.is_empty() {
        return Err(SigningError::EncodingFailed("empty signature".to_owned()));
    }
    Ok(Signature { pub_key, signature })
}

pub fn encode_tx_raw(tx_raw: &TxRaw) -> Vec<u8> {
    tx_raw.encode_to_vec()
}

/// Upper-case hex sha256 of the raw transaction bytes.
pub fn tx_hash(tx_bytes: &[u8]) -> String {
    hex::encode_upper(Sha256::digest(tx_bytes))
}
