//! Wallet collaborator. In proxy mode every call is a JSON-RPC 2.0 request
//! to a wallet bridge process (`getAccounts`, `signDirect`, `signAmino`).

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chainboard_signing_core::domain::u64_string;
use chainboard_signing_core::proto::cosmos::tx::v1beta1::SignDoc;
use chainboard_signing_core::{
    AminoSignResponse, AminoSigner, DirectSignResponse, DirectSigner, PortError, StdSignDoc,
    StdSignature, WalletAccount, WalletConnection,
};
use prost::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::WalletModes;
use crate::deterministic::DeterministicSigner;
use crate::AdapterConfig;

/// JSON-RPC error code wallets use for a user rejection.
const USER_REJECTED: i64 = 4001;

#[derive(Debug, Clone)]
enum BridgeMode {
    Disabled(String),
    Deterministic(DeterministicSigner),
    Proxy(ProxyRuntime),
}

#[derive(Debug, Clone)]
struct ProxyRuntime {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Clone)]
pub struct WalletBridgeSigner {
    mode: BridgeMode,
    modes: WalletModes,
}

impl WalletBridgeSigner {
    pub fn with_config(config: &AdapterConfig) -> Self {
        let mode = if let Some(base_url) = &config.wallet_bridge_url {
            match reqwest::Client::builder()
                .timeout(config.http_timeout())
                .build()
            {
                Ok(client) => BridgeMode::Proxy(ProxyRuntime {
                    base_url: base_url.clone(),
                    client,
                }),
                Err(e) => {
                    if config.strict_runtime_required() {
                        BridgeMode::Disabled(format!(
                            "failed to initialize wallet bridge client in production profile: {e}"
                        ))
                    } else {
                        BridgeMode::Deterministic(DeterministicSigner::new(&config.dev_address))
                    }
                }
            }
        } else if config.strict_runtime_required() {
            BridgeMode::Disabled(
                "wallet bridge URL not configured in production runtime profile".to_owned(),
            )
        } else {
            BridgeMode::Deterministic(DeterministicSigner::new(&config.dev_address))
        };

        if let BridgeMode::Disabled(reason) = &mode {
            warn!("wallet signer disabled: {reason}");
        }
        Self {
            mode,
            modes: config.wallet_modes,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.mode, BridgeMode::Disabled(_))
    }

    async fn proxy_call(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let proxy = match &self.mode {
            BridgeMode::Proxy(proxy) => proxy,
            BridgeMode::Disabled(reason) => return Err(PortError::Policy(reason.clone())),
            BridgeMode::Deterministic(_) => {
                return Err(PortError::NotImplemented("wallet bridge runtime not enabled"))
            }
        };

        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        debug!(method, "wallet bridge request");
        let response = proxy
            .client
            .post(&proxy.base_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("wallet bridge request failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| PortError::Transport(format!("wallet bridge json decode failed: {e}")))?;
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "wallet bridge status {status}: {body}"
            )));
        }
        if let Some(err) = body.get("error") {
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("wallet error")
                .to_owned();
            if err.get("code").and_then(Value::as_i64) == Some(USER_REJECTED) {
                return Err(PortError::Rejected(message));
            }
            return Err(PortError::Transport(format!(
                "wallet bridge returned error: {err}"
            )));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport("wallet bridge missing result".to_owned()))
    }
}

#[derive(Debug, Deserialize)]
struct BridgeAccount {
    address: String,
    #[serde(default = "default_algo")]
    algo: String,
    pubkey: String,
}

fn default_algo() -> String {
    "secp256k1".to_owned()
}

/// `SignDoc` with base64 byte fields, as wallets exchange it over JSON.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignDocJson {
    body_bytes: String,
    auth_info_bytes: String,
    chain_id: String,
    #[serde(with = "u64_string")]
    account_number: u64,
}

impl From<&SignDoc> for SignDocJson {
    fn from(doc: &SignDoc) -> Self {
        Self {
            body_bytes: BASE64.encode(&doc.body_bytes),
            auth_info_bytes: BASE64.encode(&doc.auth_info_bytes),
            chain_id: doc.chain_id.clone(),
            account_number: doc.account_number,
        }
    }
}

impl SignDocJson {
    fn into_sign_doc(self) -> Result<SignDoc, PortError> {
        let bytes = |field: &str, raw: &str| {
            BASE64
                .decode(raw)
                .map_err(|e| PortError::Validation(format!("signed {field}: {e}")))
        };
        Ok(SignDoc {
            body_bytes: bytes("bodyBytes", &self.body_bytes)?,
            auth_info_bytes: bytes("authInfoBytes", &self.auth_info_bytes)?,
            chain_id: self.chain_id,
            account_number: self.account_number,
        })
    }
}

#[derive(Debug, Deserialize)]
struct DirectResult {
    signed: SignDocJson,
    signature: StdSignature,
}

#[derive(Debug, Deserialize)]
struct AminoResult {
    signed: StdSignDoc,
    signature: StdSignature,
}

fn decode_result<T: for<'de> Deserialize<'de>>(value: Value, method: &str) -> Result<T, PortError> {
    serde_json::from_value(value)
        .map_err(|e| PortError::Validation(format!("{method} result: {e}")))
}

#[async_trait]
impl WalletConnection for WalletBridgeSigner {
    async fn accounts(&self) -> Result<Vec<WalletAccount>, PortError> {
        if let BridgeMode::Deterministic(signer) = &self.mode {
            return Ok(vec![signer.account()]);
        }
        let result = self.proxy_call("getAccounts", serde_json::json!([])).await?;
        let accounts: Vec<BridgeAccount> = decode_result(result, "getAccounts")?;
        accounts
            .into_iter()
            .map(|account| {
                let pub_key = BASE64.decode(&account.pubkey).map_err(|e| {
                    PortError::Validation(format!("pubkey of {}: {e}", account.address))
                })?;
                Ok(WalletAccount {
                    address: account.address,
                    algo: account.algo,
                    pub_key,
                })
            })
            .collect()
    }

    fn as_direct(&self) -> Option<&dyn DirectSigner> {
        match self.mode {
            BridgeMode::Disabled(_) => None,
            _ if self.modes.direct => Some(self),
            _ => None,
        }
    }

    fn as_amino(&self) -> Option<&dyn AminoSigner> {
        match self.mode {
            BridgeMode::Disabled(_) => None,
            _ if self.modes.amino => Some(self),
            _ => None,
        }
    }
}

#[async_trait]
impl DirectSigner for WalletBridgeSigner {
    async fn sign_direct(
        &self,
        signer_address: &str,
        sign_doc: SignDoc,
    ) -> Result<DirectSignResponse, PortError> {
        if let BridgeMode::Deterministic(signer) = &self.mode {
            let signature = signer.signature("direct", &sign_doc.encode_to_vec());
            return Ok(DirectSignResponse {
                signed: sign_doc,
                signature,
            });
        }
        let params = serde_json::json!([signer_address, SignDocJson::from(&sign_doc)]);
        let result: DirectResult =
            decode_result(self.proxy_call("signDirect", params).await?, "signDirect")?;
        Ok(DirectSignResponse {
            signed: result.signed.into_sign_doc()?,
            signature: result.signature,
        })
    }
}

#[async_trait]
impl AminoSigner for WalletBridgeSigner {
    async fn sign_amino(
        &self,
        signer_address: &str,
        sign_doc: StdSignDoc,
    ) -> Result<AminoSignResponse, PortError> {
        if let BridgeMode::Deterministic(signer) = &self.mode {
            let bytes = sign_doc
                .sign_bytes()
                .map_err(|e| PortError::Validation(e.to_string()))?;
            let signature = signer.signature("amino", &bytes);
            return Ok(AminoSignResponse {
                signed: sign_doc,
                signature,
            });
        }
        let params = serde_json::json!([signer_address, sign_doc]);
        let result: AminoResult =
            decode_result(self.proxy_call("signAmino", params).await?, "signAmino")?;
        Ok(AminoSignResponse {
            signed: result.signed,
            signature: result.signature,
        })
    }
}
