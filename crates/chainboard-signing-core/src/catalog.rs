//! Message types known to the dashboard: binary bindings and amino field
//! tables for each of them.

use crate::amino::{AminoField, FieldKind, FieldTableConverter};
use crate::codec::IntentMessage;
use crate::domain::{Coin, Fields};
use crate::error::CodecError;
use crate::proto::chainboard::identity::v1::{
    MsgAddIdentifier, MsgRegisterIdentifier, MsgRenewIdentifier,
};
use crate::proto::chainboard::registry::v1::{MsgCreateEntry, MsgUpdateEntry};
use crate::proto::cosmos::bank::v1beta1::MsgSend;
use crate::proto::cosmos::base::v1beta1::Coin as ProtoCoin;
use crate::registry::Registry;

pub mod type_urls {
    pub const MSG_SEND: &str = "/cosmos.bank.v1beta1.MsgSend";
    pub const MSG_REGISTER_IDENTIFIER: &str = "/chainboard.identity.v1.MsgRegisterIdentifier";
    pub const MSG_ADD_IDENTIFIER: &str = "/chainboard.identity.v1.MsgAddIdentifier";
    pub const MSG_RENEW_IDENTIFIER: &str = "/chainboard.identity.v1.MsgRenewIdentifier";
    pub const MSG_CREATE_ENTRY: &str = "/chainboard.registry.v1.MsgCreateEntry";
    pub const MSG_UPDATE_ENTRY: &str = "/chainboard.registry.v1.MsgUpdateEntry";
}

use FieldKind::{Coins, Text, Uint64};

const MSG_SEND_FIELDS: &[AminoField] = &[
    AminoField::required("fromAddress", Text),
    AminoField::required("toAddress", Text),
    AminoField::required("amount", Coins),
];

const MSG_REGISTER_IDENTIFIER_FIELDS: &[AminoField] = &[
    AminoField::required("owner", Text),
    AminoField::required("name", Text),
    AminoField::required("periods", Uint64),
    AminoField::required("deposit", FieldKind::Coin),
];

const MSG_ADD_IDENTIFIER_FIELDS: &[AminoField] = &[
    AminoField::required("owner", Text),
    AminoField::required("name", Text),
    AminoField::required("identifier", Text),
    AminoField::required("target", Text),
];

const MSG_RENEW_IDENTIFIER_FIELDS: &[AminoField] = &[
    AminoField::required("owner", Text),
    AminoField::required("name", Text),
    AminoField::required("periods", Uint64),
    AminoField::optional("deposit", FieldKind::Coin),
];

const MSG_CREATE_ENTRY_FIELDS: &[AminoField] = &[
    AminoField::required("creator", Text),
    AminoField::required("title", Text),
    AminoField::required("metadataUri", Text),
    AminoField::required("maxSupply", Uint64),
    AminoField::required("deposit", FieldKind::Coin),
];

const MSG_UPDATE_ENTRY_FIELDS: &[AminoField] = &[
    AminoField::required("creator", Text),
    AminoField::required("entryId", Uint64),
    AminoField::optional("title", Text),
    AminoField::optional("maxSupply", Uint64),
    AminoField::optional("royaltyBps", Uint64),
];

/// Registers every catalog message with both codec registries.
pub fn register_defaults(registry: &mut Registry) {
    registry.register::<MsgSend>(FieldTableConverter::new("cosmos-sdk/MsgSend", MSG_SEND_FIELDS));
    registry.register::<MsgRegisterIdentifier>(FieldTableConverter::new(
        "identity/RegisterIdentifier",
        MSG_REGISTER_IDENTIFIER_FIELDS,
    ));
    registry.register::<MsgAddIdentifier>(FieldTableConverter::new(
        "identity/AddIdentifier",
        MSG_ADD_IDENTIFIER_FIELDS,
    ));
    registry.register::<MsgRenewIdentifier>(FieldTableConverter::new(
        "identity/RenewIdentifier",
        MSG_RENEW_IDENTIFIER_FIELDS,
    ));
    registry.register::<MsgCreateEntry>(FieldTableConverter::new(
        "registry/CreateEntry",
        MSG_CREATE_ENTRY_FIELDS,
    ));
    registry.register::<MsgUpdateEntry>(FieldTableConverter::new(
        "registry/UpdateEntry",
        MSG_UPDATE_ENTRY_FIELDS,
    ));
}

fn coins_from_proto(coins: &[ProtoCoin]) -> Result<Vec<Coin>, CodecError> {
    coins.iter().map(Coin::from_proto).collect()
}

fn opt_coin_from_proto(coin: Option<&ProtoCoin>) -> Result<Option<Coin>, CodecError> {
    coin.map(Coin::from_proto).transpose()
}

impl IntentMessage for MsgSend {
    const TYPE_URL: &'static str = type_urls::MSG_SEND;

    fn from_fields(fields: &Fields) -> Result<Self, CodecError> {
        Ok(Self {
            from_address: fields.text("fromAddress")?.to_owned(),
            to_address: fields.text("toAddress")?.to_owned(),
            amount: fields.coins("amount")?.iter().map(Coin::to_proto).collect(),
        })
    }

    fn into_fields(self) -> Result<Fields, CodecError> {
        let mut fields = Fields::new();
        fields.insert("fromAddress", self.from_address);
        fields.insert("toAddress", self.to_address);
        fields.insert("amount", coins_from_proto(&self.amount)?);
        Ok(fields)
    }
}

impl IntentMessage for MsgRegisterIdentifier {
    const TYPE_URL: &'static str = type_urls::MSG_REGISTER_IDENTIFIER;

    fn from_fields(fields: &Fields) -> Result<Self, CodecError> {
        Ok(Self {
            owner: fields.text("owner")?.to_owned(),
            name: fields.text("name")?.to_owned(),
            periods: fields.uint("periods")?,
            deposit: Some(fields.coin("deposit")?.to_proto()),
        })
    }

    fn into_fields(self) -> Result<Fields, CodecError> {
        let mut fields = Fields::new();
        fields.insert("owner", self.owner);
        fields.insert("name", self.name);
        fields.insert("periods", self.periods);
        fields.insert_opt("deposit", opt_coin_from_proto(self.deposit.as_ref())?);
        Ok(fields)
    }
}

impl IntentMessage for MsgAddIdentifier {
    const TYPE_URL: &'static str = type_urls::MSG_ADD_IDENTIFIER;

    fn from_fields(fields: &Fields) -> Result<Self, CodecError> {
        Ok(Self {
            owner: fields.text("owner")?.to_owned(),
            name: fields.text("name")?.to_owned(),
            identifier: fields.text("identifier")?.to_owned(),
            target: fields.text("target")?.to_owned(),
        })
    }

    fn into_fields(self) -> Result<Fields, CodecError> {
        let mut fields = Fields::new();
        fields.insert("owner", self.owner);
        fields.insert("name", self.name);
        fields.insert("identifier", self.identifier);
        fields.insert("target", self.target);
        Ok(fields)
    }
}

impl IntentMessage for MsgRenewIdentifier {
    const TYPE_URL: &'static str = type_urls::MSG_RENEW_IDENTIFIER;

    fn from_fields(fields: &Fields) -> Result<Self, CodecError> {
        Ok(Self {
            owner: fields.text("owner")?.to_owned(),
            name: fields.text("name")?.to_owned(),
            periods: fields.uint("periods")?,
            deposit: fields.opt_coin("deposit")?.map(Coin::to_proto),
        })
    }

    fn into_fields(self) -> Result<Fields, CodecError> {
        let mut fields = Fields::new();
        fields.insert("owner", self.owner);
        fields.insert("name", self.name);
        fields.insert("periods", self.periods);
        fields.insert_opt("deposit", opt_coin_from_proto(self.deposit.as_ref())?);
        Ok(fields)
    }
}

impl IntentMessage for MsgCreateEntry {
    const TYPE_URL: &'static str = type_urls::MSG_CREATE_ENTRY;

    fn from_fields(fields: &Fields) -> Result<Self, CodecError> {
        Ok(Self {
            creator: fields.text("creator")?.to_owned(),
            title: fields.text("title")?.to_owned(),
            metadata_uri: fields.text("metadataUri")?.to_owned(),
            max_supply: fields.uint("maxSupply")?,
            deposit: Some(fields.coin("deposit")?.to_proto()),
        })
    }

    fn into_fields(self) -> Result<Fields, CodecError> {
        let mut fields = Fields::new();
        fields.insert("creator", self.creator);
        fields.insert("title", self.title);
        fields.insert("metadataUri", self.metadata_uri);
        fields.insert("maxSupply", self.max_supply);
        fields.insert_opt("deposit", opt_coin_from_proto(self.deposit.as_ref())?);
        Ok(fields)
    }
}

impl IntentMessage for MsgUpdateEntry {
    const TYPE_URL: &'static str = type_urls::MSG_UPDATE_ENTRY;

    fn from_fields(fields: &Fields) -> Result<Self, CodecError> {
        Ok(Self {
            creator: fields.text("creator")?.to_owned(),
            entry_id: fields.uint("entryId")?,
            title: fields.opt_text("title")?.map(str::to_owned),
            max_supply: fields.opt_uint("maxSupply")?,
            royalty_bps: fields.opt_uint("royaltyBps")?,
        })
    }

    fn into_fields(self) -> Result<Fields, CodecError> {
        let mut fields = Fields::new();
        fields.insert("creator", self.creator);
        fields.insert("entryId", self.entry_id);
        fields.insert_opt("title", self.title);
        fields.insert_opt("maxSupply", self.max_supply);
        fields.insert_opt("royaltyBps", self.royalty_bps);
        Ok(fields)
    }
}
