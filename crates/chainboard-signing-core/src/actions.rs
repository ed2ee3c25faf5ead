//! Caller-facing actions and the message intents each one builds.
//!
//! Requests are JSON tagged by `action` with the parameters under `params`:
//!
//! ```json
//! {"action": "renewIdentifier", "params": {"name": "alice", "periods": "2"}, "memo": ""}
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::type_urls;
use crate::domain::{u64_string, Coin, MessageIntent};
use crate::error::SigningError;
use crate::events::EventSelector;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendParams {
    pub to_address: String,
    pub amount: Vec<Coin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterIdentifierParams {
    pub name: String,
    #[serde(with = "u64_string")]
    pub periods: u64,
    pub deposit: Coin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddIdentifierParams {
    pub name: String,
    pub identifier: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewIdentifierParams {
    pub name: String,
    #[serde(with = "u64_string")]
    pub periods: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit: Option<Coin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryParams {
    pub title: String,
    pub metadata_uri: String,
    #[serde(with = "u64_string")]
    pub max_supply: u64,
    pub deposit: Coin,
}

/// Partial update: absent fields are left unchanged on chain, a present
/// zero is an explicit zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryParams {
    #[serde(with = "u64_string")]
    pub entry_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "u64_string::option"
    )]
    pub max_supply: Option<u64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "u64_string::option"
    )]
    pub royalty_bps: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "params", rename_all = "camelCase")]
pub enum Action {
    Send(SendParams),
    RegisterIdentifier(RegisterIdentifierParams),
    AddIdentifier(AddIdentifierParams),
    RenewIdentifier(RenewIdentifierParams),
    CreateEntry(CreateEntryParams),
    UpdateEntry(UpdateEntryParams),
}

const REGISTERED_IDENTIFIER: EventSelector =
    EventSelector::new("register_identifier", "identifier_id");
const ADDED_IDENTIFIER: EventSelector = EventSelector::new("add_identifier", "identifier");
const CREATED_ENTRY: EventSelector = EventSelector::new("create_entry", "entry_id");

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Send(_) => "send",
            Action::RegisterIdentifier(_) => "registerIdentifier",
            Action::AddIdentifier(_) => "addIdentifier",
            Action::RenewIdentifier(_) => "renewIdentifier",
            Action::CreateEntry(_) => "createEntry",
            Action::UpdateEntry(_) => "updateEntry",
        }
    }

    /// Where the chain reports the identifier this action creates, if any.
    pub fn event_selector(&self) -> Option<EventSelector> {
        match self {
            Action::RegisterIdentifier(_) => Some(REGISTERED_IDENTIFIER),
            Action::AddIdentifier(_) => Some(ADDED_IDENTIFIER),
            Action::CreateEntry(_) => Some(CREATED_ENTRY),
            Action::Send(_) | Action::RenewIdentifier(_) | Action::UpdateEntry(_) => None,
        }
    }

    /// Builds the message set signed on behalf of `sender`.
    pub fn messages(&self, sender: &str) -> Result<Vec<MessageIntent>, SigningError> {
        let intent = match self {
            Action::Send(p) => {
                if p.amount.is_empty() {
                    return Err(invalid("send requires at least one coin"));
                }
                MessageIntent::new(type_urls::MSG_SEND)
                    .with("fromAddress", sender)
                    .with("toAddress", p.to_address.as_str())
                    .with("amount", p.amount.clone())
            }
            Action::RegisterIdentifier(p) => {
                require_name(&p.name)?;
                require_periods(p.periods)?;
                MessageIntent::new(type_urls::MSG_REGISTER_IDENTIFIER)
                    .with("owner", sender)
                    .with("name", p.name.as_str())
                    .with("periods", p.periods)
                    .with("deposit", p.deposit.clone())
            }
            Action::AddIdentifier(p) => {
                require_name(&p.name)?;
                MessageIntent::new(type_urls::MSG_ADD_IDENTIFIER)
                    .with("owner", sender)
                    .with("name", p.name.as_str())
                    .with("identifier", p.identifier.as_str())
                    .with("target", p.target.as_str())
            }
            Action::RenewIdentifier(p) => {
                require_name(&p.name)?;
                require_periods(p.periods)?;
                MessageIntent::new(type_urls::MSG_RENEW_IDENTIFIER)
                    .with("owner", sender)
                    .with("name", p.name.as_str())
                    .with("periods", p.periods)
                    .with_opt("deposit", p.deposit.clone())
            }
            Action::CreateEntry(p) => MessageIntent::new(type_urls::MSG_CREATE_ENTRY)
                .with("creator", sender)
                .with("title", p.title.as_str())
                .with("metadataUri", p.metadata_uri.as_str())
                .with("maxSupply", p.max_supply)
                .with("deposit", p.deposit.clone()),
            Action::UpdateEntry(p) => MessageIntent::new(type_urls::MSG_UPDATE_ENTRY)
                .with("creator", sender)
                .with("entryId", p.entry_id)
                .with_opt("title", p.title.clone())
                .with_opt("maxSupply", p.max_supply)
                .with_opt("royaltyBps", p.royalty_bps),
        };
        Ok(vec![intent])
    }
}

fn invalid(reason: &str) -> SigningError {
    SigningError::InvalidRequest(reason.to_owned())
}

fn require_name(name: &str) -> Result<(), SigningError> {
    if name.trim().is_empty() {
        return Err(invalid("name must not be empty"));
    }
    Ok(())
}

fn require_periods(periods: u64) -> Result<(), SigningError> {
    if periods == 0 {
        return Err(invalid("periods must be at least 1"));
    }
    Ok(())
}

/// One invocation: the action plus transaction-level options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    #[serde(flatten)]
    pub action: Action,
    #[serde(default)]
    pub memo: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "u64_string::option"
    )]
    pub timeout_height: Option<u64>,
}

impl ActionRequest {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            memo: String::new(),
            timeout_height: None,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }
}
