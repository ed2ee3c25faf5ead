//! Legacy amino JSON: converters between intents and the wallet-facing JSON
//! shape, and the `StdSignDoc` that amino-only wallets sign.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{u64_string, Coin, FieldValue, Fields, MessageIntent};
use crate::error::CodecError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AminoMsg {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Vec<Coin>,
    #[serde(with = "u64_string")]
    pub gas: u64,
}

/// Document signed in `SIGN_MODE_LEGACY_AMINO_JSON`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdSignDoc {
    #[serde(with = "u64_string")]
    pub account_number: u64,
    pub chain_id: String,
    pub fee: StdFee,
    pub memo: String,
    pub msgs: Vec<AminoMsg>,
    #[serde(with = "u64_string")]
    pub sequence: u64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "u64_string::option"
    )]
    pub timeout_height: Option<u64>,
}

impl StdSignDoc {
    /// Canonical sign bytes: keys sorted at every level, no whitespace, and
    /// `&`, `<`, `>` escaped the way the SDK's JSON encoder does.
    pub fn sign_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let value = serde_json::to_value(self).map_err(|e| CodecError::Amino(e.to_string()))?;
        let json = serde_json::to_string(&sort_keys(value))
            .map_err(|e| CodecError::Amino(e.to_string()))?;
        Ok(json
            .replace('&', "\\u0026")
            .replace('<', "\\u003c")
            .replace('>', "\\u003e")
            .into_bytes())
    }
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, sort_keys(v))).collect();
            Value::Object(sorted.into_iter().collect::<Map<String, Value>>())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// JSON converter for one message type.
pub trait AminoConverter: Send + Sync {
    fn amino_type(&self) -> &str;
    fn to_amino(&self, fields: &Fields) -> Result<Value, CodecError>;
    fn from_amino(&self, value: &Value) -> Result<Fields, CodecError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Uint64,
    Coin,
    Coins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AminoField {
    /// Intent field name (lowerCamelCase).
    pub name: &'static str,
    pub kind: FieldKind,
    /// Optional fields are omitted from the JSON when unset.
    pub optional: bool,
}

impl AminoField {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            optional: false,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            optional: true,
        }
    }

    /// Wallet-facing key.
    pub fn amino_name(&self) -> String {
        self.name.to_case(Case::Snake)
    }
}

/// Converter driven by a static field table.
#[derive(Debug, Clone, Copy)]
pub struct FieldTableConverter {
    amino_type: &'static str,
    fields: &'static [AminoField],
}

impl FieldTableConverter {
    pub const fn new(amino_type: &'static str, fields: &'static [AminoField]) -> Self {
        Self { amino_type, fields }
    }
}

impl AminoConverter for FieldTableConverter {
    fn amino_type(&self) -> &str {
        self.amino_type
    }

    fn to_amino(&self, fields: &Fields) -> Result<Value, CodecError> {
        if let Some((unknown, _)) = fields
            .iter()
            .find(|(name, _)| !self.fields.iter().any(|f| f.name == name.as_str()))
        {
            return Err(CodecError::InvalidValue {
                field: unknown.clone(),
                reason: format!("not a field of {}", self.amino_type),
            });
        }

        let mut out = Map::new();
        for field in self.fields {
            let value = match fields.get(field.name) {
                Some(value) => value,
                None if field.optional => continue,
                None => return Err(CodecError::MissingField(field.name.to_owned())),
            };
            out.insert(field.amino_name(), render(field, value)?);
        }
        Ok(Value::Object(out))
    }

    fn from_amino(&self, value: &Value) -> Result<Fields, CodecError> {
        let object = value.as_object().ok_or_else(|| {
            CodecError::Amino(format!("{} value must be a JSON object", self.amino_type))
        })?;

        if let Some(unknown) = object
            .keys()
            .find(|key| !self.fields.iter().any(|f| &f.amino_name() == *key))
        {
            return Err(CodecError::Amino(format!(
                "unexpected key {unknown:?} in {}",
                self.amino_type
            )));
        }

        let mut fields = Fields::new();
        for field in self.fields {
            match object.get(&field.amino_name()) {
                None | Some(Value::Null) if field.optional => {}
                None | Some(Value::Null) => {
                    return Err(CodecError::MissingField(field.name.to_owned()))
                }
                Some(raw) => fields.insert(field.name, parse(field, raw)?),
            }
        }
        Ok(fields)
    }
}

fn render(field: &AminoField, value: &FieldValue) -> Result<Value, CodecError> {
    let mismatch = || CodecError::WrongKind {
        field: field.name.to_owned(),
        expected: kind_name(field.kind),
        found: value.kind(),
    };
    let rendered = match (field.kind, value) {
        (FieldKind::Text, FieldValue::Text(s)) => Value::String(s.clone()),
        (FieldKind::Uint64, FieldValue::Uint(v)) => Value::String(v.to_string()),
        (FieldKind::Coin, FieldValue::Coin(c)) => coin_json(c),
        (FieldKind::Coins, FieldValue::Coins(cs)) => Value::Array(cs.iter().map(coin_json).collect()),
        _ => return Err(mismatch()),
    };
    Ok(rendered)
}

fn coin_json(coin: &Coin) -> Value {
    serde_json::json!({
        "amount": coin.amount.to_str_radix(10),
        "denom": coin.denom,
    })
}

fn parse(field: &AminoField, raw: &Value) -> Result<FieldValue, CodecError> {
    let invalid = |reason: String| CodecError::InvalidValue {
        field: field.name.to_owned(),
        reason,
    };
    match field.kind {
        FieldKind::Text => raw
            .as_str()
            .map(|s| FieldValue::Text(s.to_owned()))
            .ok_or_else(|| invalid("expected a string".to_owned())),
        FieldKind::Uint64 => match raw {
            Value::String(s) => s
                .parse::<u64>()
                .map(FieldValue::Uint)
                .map_err(|e| invalid(format!("{s:?}: {e}"))),
            // Integer literals are read without a float detour; fractional
            // numbers are refused.
            Value::Number(n) => n
                .as_u64()
                .map(FieldValue::Uint)
                .ok_or_else(|| invalid(format!("{n} is not an unsigned 64-bit integer"))),
            _ => Err(invalid("expected a decimal string".to_owned())),
        },
        FieldKind::Coin => parse_coin(raw).map(FieldValue::Coin).map_err(invalid),
        FieldKind::Coins => raw
            .as_array()
            .ok_or_else(|| invalid("expected an array of coins".to_owned()))?
            .iter()
            .map(parse_coin)
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::Coins)
            .map_err(invalid),
    }
}

fn parse_coin(raw: &Value) -> Result<Coin, String> {
    Coin::deserialize(raw).map_err(|e| format!("invalid coin: {e}"))
}

fn kind_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => "text",
        FieldKind::Uint64 => "uint64",
        FieldKind::Coin => "coin",
        FieldKind::Coins => "coins",
    }
}

/// Amino converters keyed by type identifier, with a reverse index on the
/// amino type name.
#[derive(Default)]
pub struct AminoCodecRegistry {
    by_type_url: HashMap<String, Arc<dyn AminoConverter>>,
    by_amino_type: HashMap<String, String>,
}

impl AminoCodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, type_url: impl Into<String>, converter: impl AminoConverter + 'static) {
        let type_url = type_url.into();
        self.by_amino_type
            .insert(converter.amino_type().to_owned(), type_url.clone());
        self.by_type_url.insert(type_url, Arc::new(converter));
    }

    pub fn is_registered(&self, type_url: &str) -> bool {
        self.by_type_url.contains_key(type_url)
    }

    pub fn to_amino(&self, intent: &MessageIntent) -> Result<AminoMsg, CodecError> {
        let converter = self
            .by_type_url
            .get(&intent.type_url)
            .ok_or_else(|| CodecError::Unregistered(intent.type_url.clone()))?;
        Ok(AminoMsg {
            kind: converter.amino_type().to_owned(),
            value: converter.to_amino(&intent.fields)?,
        })
    }

    pub fn from_amino(&self, msg: &AminoMsg) -> Result<MessageIntent, CodecError> {
        let type_url = self
            .by_amino_type
            .get(&msg.kind)
            .ok_or_else(|| CodecError::Unregistered(msg.kind.clone()))?;
        let converter = self
            .by_type_url
            .get(type_url)
            .ok_or_else(|| CodecError::Unregistered(type_url.clone()))?;
        Ok(MessageIntent {
            type_url: type_url.clone(),
            fields: converter.from_amino(&msg.value)?,
        })
    }
}

impl fmt::Debug for AminoCodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut amino_types: Vec<_> = self.by_amino_type.keys().collect();
        amino_types.sort();
        f.debug_struct("AminoCodecRegistry")
            .field("amino_types", &amino_types)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amino_names_are_snake_case() {
        let field = AminoField::optional("metadataUri", FieldKind::Text);
        assert_eq!(field.amino_name(), "metadata_uri");
        let field = AminoField::required("fromAddress", FieldKind::Text);
        assert_eq!(field.amino_name(), "from_address");
    }

    #[test]
    fn sign_bytes_sort_keys_and_escape_html() {
        let doc = StdSignDoc {
            account_number: 7,
            chain_id: "chainboard-1".to_owned(),
            fee: StdFee {
                amount: vec![Coin::new(3750u64, "uchain")],
                gas: 150_000,
            },
            memo: "<b>&</b>".to_owned(),
            msgs: vec![AminoMsg {
                kind: "test/Msg".to_owned(),
                value: serde_json::json!({"z": "1", "a": "2"}),
            }],
            sequence: 3,
            timeout_height: None,
        };
        let bytes = doc.sign_bytes().expect("sign bytes");
        let text = String::from_utf8(bytes).expect("utf8");
        assert_eq!(
            text,
            r#"{"account_number":"7","chain_id":"chainboard-1","fee":{"amount":[{"amount":"3750","denom":"uchain"}],"gas":"150000"},"memo":"\u003cb\u003e\u0026\u003c/b\u003e","msgs":[{"type":"test/Msg","value":{"a":"2","z":"1"}}],"sequence":"3"}"#
        );
    }
}
