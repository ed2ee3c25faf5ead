//! Node collaborator over the Cosmos SDK REST gateway.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chainboard_signing_core::domain::{u64_string, AccountPubKey};
use chainboard_signing_core::{
    BaseAccount, BroadcastResult, CheckTxResponse, Event, NodePort, PortError,
};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::AdapterConfig;

#[derive(Debug, Clone)]
enum NodeMode {
    Disabled(String),
    Http(HttpRuntime),
}

#[derive(Debug, Clone)]
struct HttpRuntime {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Clone)]
pub struct NodeRestAdapter {
    mode: NodeMode,
}

impl NodeRestAdapter {
    pub fn with_config(config: &AdapterConfig) -> Self {
        let mode = match &config.rest_url {
            Some(base_url) => match reqwest::Client::builder()
                .timeout(config.http_timeout())
                .build()
            {
                Ok(client) => NodeMode::Http(HttpRuntime {
                    base_url: base_url.trim_end_matches('/').to_owned(),
                    client,
                }),
                Err(e) => NodeMode::Disabled(format!("failed to initialize REST client: {e}")),
            },
            None => NodeMode::Disabled("node REST URL not configured".to_owned()),
        };
        Self { mode }
    }

    fn runtime(&self) -> Result<&HttpRuntime, PortError> {
        match &self.mode {
            NodeMode::Http(runtime) => Ok(runtime),
            NodeMode::Disabled(reason) => Err(PortError::Policy(reason.clone())),
        }
    }

    async fn get(&self, path: &str) -> Result<(StatusCode, Value), PortError> {
        let runtime = self.runtime()?;
        let response = runtime
            .client
            .get(format!("{}{path}", runtime.base_url))
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("node request failed: {e}")))?;
        read_json(response).await
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<(StatusCode, Value), PortError> {
        let runtime = self.runtime()?;
        let response = runtime
            .client
            .post(format!("{}{path}", runtime.base_url))
            .json(payload)
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("node request failed: {e}")))?;
        read_json(response).await
    }
}

async fn read_json(response: reqwest::Response) -> Result<(StatusCode, Value), PortError> {
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .map_err(|e| PortError::Transport(format!("node json decode failed: {e}")))?;
    Ok((status, body))
}

fn error_message(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| body.to_string())
}

fn is_not_found(status: StatusCode, body: &Value) -> bool {
    // gRPC NotFound is code 5; older gateways answer 400 with a message.
    status == StatusCode::NOT_FOUND
        || body.get("code").and_then(Value::as_u64) == Some(5)
        || error_message(body).contains("not found")
}

fn status_error(status: StatusCode, body: &Value) -> PortError {
    if status.is_client_error() {
        PortError::Validation(format!("node status {status}: {}", error_message(body)))
    } else {
        PortError::Transport(format!("node status {status}: {}", error_message(body)))
    }
}

fn decode<T: for<'de> Deserialize<'de>>(value: Value, what: &str) -> Result<T, PortError> {
    serde_json::from_value(value).map_err(|e| PortError::Validation(format!("{what}: {e}")))
}

#[derive(Debug, Deserialize)]
struct RestPubKey {
    #[serde(rename = "@type")]
    type_url: String,
    key: String,
}

#[derive(Debug, Deserialize)]
struct RestBaseAccount {
    address: String,
    #[serde(default)]
    pub_key: Option<RestPubKey>,
    #[serde(with = "u64_string")]
    account_number: u64,
    #[serde(with = "u64_string")]
    sequence: u64,
}

/// Plain base accounts, or account types that wrap one (vesting accounts,
/// ethermint accounts).
fn base_account_json(account: &Value) -> Option<&Value> {
    if account.get("account_number").is_some() {
        return Some(account);
    }
    account
        .get("base_account")
        .or_else(|| account.pointer("/base_vesting_account/base_account"))
        .and_then(|inner| base_account_json(inner).or(Some(inner)))
}

fn parse_account(body: &Value) -> Result<BaseAccount, PortError> {
    let account = body
        .get("account")
        .and_then(base_account_json)
        .ok_or_else(|| PortError::Validation("account response has no base account".to_owned()))?;
    let raw: RestBaseAccount = decode(account.clone(), "account")?;
    let pub_key = raw
        .pub_key
        .map(|pk| {
            BASE64
                .decode(&pk.key)
                .map(|key| AccountPubKey {
                    type_url: pk.type_url,
                    key,
                })
                .map_err(|e| PortError::Validation(format!("account pub_key: {e}")))
        })
        .transpose()?;
    Ok(BaseAccount {
        address: raw.address,
        account_number: raw.account_number,
        sequence: raw.sequence,
        pub_key,
    })
}

#[derive(Debug, Deserialize)]
struct RestTxResponse {
    #[serde(default, with = "u64_string")]
    height: u64,
    txhash: String,
    #[serde(default)]
    code: u32,
    #[serde(default)]
    raw_log: String,
    #[serde(default, with = "u64_string")]
    gas_wanted: u64,
    #[serde(default, with = "u64_string")]
    gas_used: u64,
    #[serde(default)]
    events: Vec<Event>,
}

fn parse_tx_response(body: Value) -> Result<RestTxResponse, PortError> {
    let tx_response = body
        .get("tx_response")
        .cloned()
        .ok_or_else(|| PortError::Validation("response has no tx_response".to_owned()))?;
    decode(tx_response, "tx_response")
}

#[async_trait]
impl NodePort for NodeRestAdapter {
    async fn chain_id(&self) -> Result<String, PortError> {
        let (status, body) = self
            .get("/cosmos/base/tendermint/v1beta1/node_info")
            .await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        body.pointer("/default_node_info/network")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| PortError::Validation("node_info has no network".to_owned()))
    }

    async fn account(&self, address: &str) -> Result<Option<BaseAccount>, PortError> {
        let (status, body) = self
            .get(&format!("/cosmos/auth/v1beta1/accounts/{address}"))
            .await?;
        if !status.is_success() {
            if is_not_found(status, &body) {
                return Ok(None);
            }
            return Err(status_error(status, &body));
        }
        let account = parse_account(&body)?;
        debug!(address, sequence = account.sequence, "account fetched");
        Ok(Some(account))
    }

    async fn simulate(&self, tx_bytes: Vec<u8>) -> Result<Option<u64>, PortError> {
        let payload = serde_json::json!({ "tx_bytes": BASE64.encode(tx_bytes) });
        let (status, body) = self.post("/cosmos/tx/v1beta1/simulate", &payload).await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        match body.pointer("/gas_info/gas_used") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => s
                .parse()
                .map(Some)
                .map_err(|e| PortError::Validation(format!("gas_used {s:?}: {e}"))),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(Some)
                .ok_or_else(|| PortError::Validation(format!("gas_used {n} is not an integer"))),
            Some(other) => Err(PortError::Validation(format!("unexpected gas_used {other}"))),
        }
    }

    async fn broadcast_tx_sync(&self, tx_bytes: Vec<u8>) -> Result<CheckTxResponse, PortError> {
        let payload = serde_json::json!({
            "tx_bytes": BASE64.encode(tx_bytes),
            "mode": "BROADCAST_MODE_SYNC",
        });
        let (status, body) = self.post("/cosmos/tx/v1beta1/txs", &payload).await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        let response = parse_tx_response(body)?;
        Ok(CheckTxResponse {
            code: response.code,
            tx_hash: response.txhash,
            raw_log: response.raw_log,
        })
    }

    async fn query_tx(&self, tx_hash: &str) -> Result<Option<BroadcastResult>, PortError> {
        let (status, body) = self
            .get(&format!("/cosmos/tx/v1beta1/txs/{tx_hash}"))
            .await?;
        if !status.is_success() {
            if is_not_found(status, &body) {
                return Ok(None);
            }
            return Err(status_error(status, &body));
        }
        let response = parse_tx_response(body)?;
        Ok(Some(BroadcastResult {
            code: response.code,
            tx_hash: response.txhash,
            raw_log: response.raw_log,
            events: response.events,
            height: response.height,
            gas_wanted: response.gas_wanted,
            gas_used: response.gas_used,
        }))
    }
}
