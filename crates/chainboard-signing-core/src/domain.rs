use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::proto;

/// Token amount. The amount is arbitrary precision because chain integers
/// (`sdk.Int`) are 256 bits wide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    #[serde(with = "decimal_string")]
    pub amount: BigUint,
}

impl Coin {
    pub fn new(amount: impl Into<BigUint>, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }

    pub fn to_proto(&self) -> proto::cosmos::base::v1beta1::Coin {
        proto::cosmos::base::v1beta1::Coin {
            denom: self.denom.clone(),
            amount: self.amount.to_str_radix(10),
        }
    }

    pub fn from_proto(coin: &proto::cosmos::base::v1beta1::Coin) -> Result<Self, CodecError> {
        Ok(Self {
            denom: coin.denom.clone(),
            amount: parse_amount(&coin.amount)?,
        })
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Parses a decimal token amount. An empty string is zero, matching the
/// chain's handling of unset `sdk.Int` values.
pub fn parse_amount(raw: &str) -> Result<BigUint, CodecError> {
    if raw.is_empty() {
        return Ok(BigUint::default());
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::InvalidValue {
            field: "amount".to_owned(),
            reason: format!("not a decimal integer: {raw:?}"),
        });
    }
    BigUint::from_str(raw).map_err(|e| CodecError::InvalidValue {
        field: "amount".to_owned(),
        reason: e.to_string(),
    })
}

/// A single field of a message intent. 64-bit quantities are `Uint`, token
/// amounts live inside `Coin`; nothing here is floating point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Uint(u64),
    Coin(Coin),
    Coins(Vec<Coin>),
}

impl FieldValue {
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Uint(_) => "uint64",
            FieldValue::Coin(_) => "coin",
            FieldValue::Coins(_) => "coins",
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Uint(value)
    }
}

impl From<Coin> for FieldValue {
    fn from(value: Coin) -> Self {
        FieldValue::Coin(value)
    }
}

impl From<Vec<Coin>> for FieldValue {
    fn from(value: Vec<Coin>) -> Self {
        FieldValue::Coins(value)
    }
}

/// Named fields of a message intent. A missing key means "unset", which is
/// distinct from a key holding zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(BTreeMap<String, FieldValue>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn insert_opt<V: Into<FieldValue>>(&mut self, name: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.insert(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    pub fn text(&self, name: &str) -> Result<&str, CodecError> {
        self.opt_text(name)?
            .ok_or_else(|| CodecError::MissingField(name.to_owned()))
    }

    pub fn opt_text(&self, name: &str) -> Result<Option<&str>, CodecError> {
        match self.0.get(name) {
            None => Ok(None),
            Some(FieldValue::Text(s)) => Ok(Some(s)),
            Some(other) => Err(wrong_kind(name, "text", other)),
        }
    }

    pub fn uint(&self, name: &str) -> Result<u64, CodecError> {
        self.opt_uint(name)?
            .ok_or_else(|| CodecError::MissingField(name.to_owned()))
    }

    pub fn opt_uint(&self, name: &str) -> Result<Option<u64>, CodecError> {
        match self.0.get(name) {
            None => Ok(None),
            Some(FieldValue::Uint(v)) => Ok(Some(*v)),
            Some(other) => Err(wrong_kind(name, "uint64", other)),
        }
    }

    pub fn coin(&self, name: &str) -> Result<&Coin, CodecError> {
        self.opt_coin(name)?
            .ok_or_else(|| CodecError::MissingField(name.to_owned()))
    }

    pub fn opt_coin(&self, name: &str) -> Result<Option<&Coin>, CodecError> {
        match self.0.get(name) {
            None => Ok(None),
            Some(FieldValue::Coin(c)) => Ok(Some(c)),
            Some(other) => Err(wrong_kind(name, "coin", other)),
        }
    }

    pub fn coins(&self, name: &str) -> Result<&[Coin], CodecError> {
        match self.0.get(name) {
            None => Err(CodecError::MissingField(name.to_owned())),
            Some(FieldValue::Coins(c)) => Ok(c),
            Some(other) => Err(wrong_kind(name, "coins", other)),
        }
    }
}

impl FromIterator<(String, FieldValue)> for Fields {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn wrong_kind(name: &str, expected: &'static str, found: &FieldValue) -> CodecError {
    CodecError::WrongKind {
        field: name.to_owned(),
        expected,
        found: found.kind(),
    }
}

/// A typed domain payload addressed to one message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageIntent {
    pub type_url: String,
    pub fields: Fields,
}

impl MessageIntent {
    pub fn new(type_url: impl Into<String>) -> Self {
        Self {
            type_url: type_url.into(),
            fields: Fields::new(),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name, value);
        self
    }

    pub fn with_opt<V: Into<FieldValue>>(mut self, name: &str, value: Option<V>) -> Self {
        self.fields.insert_opt(name, value);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSequence {
    pub account_number: u64,
    pub sequence: u64,
}

/// Public key as recorded on chain, still type tagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountPubKey {
    pub type_url: String,
    pub key: Vec<u8>,
}

/// Account state returned by the auth module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseAccount {
    pub address: String,
    pub account_number: u64,
    pub sequence: u64,
    /// `None` until the account has signed its first transaction.
    pub pub_key: Option<AccountPubKey>,
}

impl BaseAccount {
    pub fn sequence(&self) -> AccountSequence {
        AccountSequence {
            account_number: self.account_number,
            sequence: self.sequence,
        }
    }
}

/// Account exposed by the connected wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAccount {
    pub address: String,
    pub algo: String,
    pub pub_key: Vec<u8>,
}

/// Signature normalized to raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub pub_key: Vec<u8>,
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub gas_limit: u64,
}

impl Fee {
    pub fn to_proto(&self) -> proto::cosmos::tx::v1beta1::Fee {
        proto::cosmos::tx::v1beta1::Fee {
            amount: self.amount.iter().map(Coin::to_proto).collect(),
            gas_limit: self.gas_limit,
            payer: String::new(),
            granter: String::new(),
        }
    }
}

impl fmt::Display for Fee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amounts = self
            .amount
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{} (gas limit {})", amounts, self.gas_limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    /// Older nodes drop empty keys and values from `raw_log`.
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Vec<EventAttribute>,
}

/// Immediate node answer to a sync broadcast (CheckTx).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckTxResponse {
    pub code: u32,
    pub tx_hash: String,
    pub raw_log: String,
}

/// Result of an included transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastResult {
    pub code: u32,
    pub tx_hash: String,
    #[serde(default)]
    pub raw_log: String,
    /// Empty on networks that only report `raw_log`.
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub height: u64,
    #[serde(default)]
    pub gas_wanted: u64,
    #[serde(default)]
    pub gas_used: u64,
}

impl BroadcastResult {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Serde adapter rendering arbitrary precision integers as decimal strings.
pub mod decimal_string {
    use num_bigint::BigUint;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Int(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Str(s) => super::parse_amount(&s).map_err(de::Error::custom),
            Raw::Int(v) => Ok(BigUint::from(v)),
        }
    }
}

/// Serde adapter for 64-bit integers that may arrive as strings (the chain's
/// JSON convention) or as integer literals. Floats are rejected.
pub mod u64_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Int(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Str(s) => s.parse().map_err(de::Error::custom),
            Raw::Int(v) => Ok(v),
        }
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<u64>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => super::serialize(v, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<u64>, D::Error> {
            #[derive(Deserialize)]
            struct Wrapper(#[serde(with = "super")] u64);

            let value: Option<Wrapper> = Option::deserialize(deserializer)?;
            Ok(value.map(|Wrapper(v)| v))
        }
    }
}
