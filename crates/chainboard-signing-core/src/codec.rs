use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use prost::Message;

use crate::domain::{Fields, MessageIntent};
use crate::error::CodecError;
use crate::proto::google::protobuf::Any;

/// Binary codec for one message type.
pub trait MessageCodec: Send + Sync {
    fn encode(&self, fields: &Fields) -> Result<Vec<u8>, CodecError>;
    fn decode(&self, bytes: &[u8]) -> Result<Fields, CodecError>;
}

/// Binds a protobuf message to the field names of its intent.
pub trait IntentMessage: Message + Default + Sized {
    /// Type identifier the chain dispatches on.
    const TYPE_URL: &'static str;

    fn from_fields(fields: &Fields) -> Result<Self, CodecError>;
    fn into_fields(self) -> Result<Fields, CodecError>;
}

/// [`MessageCodec`] for any [`IntentMessage`].
pub struct ProstCodec<M>(PhantomData<fn() -> M>);

impl<M> ProstCodec<M> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<M> Default for ProstCodec<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: IntentMessage> MessageCodec for ProstCodec<M> {
    fn encode(&self, fields: &Fields) -> Result<Vec<u8>, CodecError> {
        Ok(M::from_fields(fields)?.encode_to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Fields, CodecError> {
        let message = M::decode(bytes).map_err(|e| CodecError::Decode {
            type_url: M::TYPE_URL.to_owned(),
            reason: e.to_string(),
        })?;
        message.into_fields()
    }
}

/// Binary codecs keyed by type identifier. Filled once at start-up and
/// read-only afterwards.
#[derive(Default)]
pub struct MessageCodecRegistry {
    codecs: HashMap<String, Box<dyn MessageCodec>>,
}

impl MessageCodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `codec` under `type_url`, replacing any previous codec.
    pub fn register(&mut self, type_url: impl Into<String>, codec: impl MessageCodec + 'static) {
        self.codecs.insert(type_url.into(), Box::new(codec));
    }

    pub fn register_message<M: IntentMessage + 'static>(&mut self) {
        self.register(M::TYPE_URL, ProstCodec::<M>::new());
    }

    pub fn is_registered(&self, type_url: &str) -> bool {
        self.codecs.contains_key(type_url)
    }

    pub fn type_urls(&self) -> impl Iterator<Item = &str> {
        self.codecs.keys().map(String::as_str)
    }

    fn codec(&self, type_url: &str) -> Result<&dyn MessageCodec, CodecError> {
        self.codecs
            .get(type_url)
            .map(|c| c.as_ref())
            .ok_or_else(|| CodecError::Unregistered(type_url.to_owned()))
    }

    pub fn encode(&self, intent: &MessageIntent) -> Result<Vec<u8>, CodecError> {
        self.codec(&intent.type_url)?.encode(&intent.fields)
    }

    /// Encodes into the type-tagged wrapper carried by a transaction body.
    pub fn encode_any(&self, intent: &MessageIntent) -> Result<Any, CodecError> {
        Ok(Any {
            type_url: intent.type_url.clone(),
            value: self.encode(intent)?,
        })
    }

    pub fn decode(&self, type_url: &str, bytes: &[u8]) -> Result<MessageIntent, CodecError> {
        let fields = self.codec(type_url)?.decode(bytes)?;
        Ok(MessageIntent {
            type_url: type_url.to_owned(),
            fields,
        })
    }

    pub fn decode_any(&self, any: &Any) -> Result<MessageIntent, CodecError> {
        self.decode(&any.type_url, &any.value)
    }
}

impl fmt::Debug for MessageCodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut type_urls: Vec<_> = self.codecs.keys().collect();
        type_urls.sort();
        f.debug_struct("MessageCodecRegistry")
            .field("type_urls", &type_urls)
            .finish()
    }
}
