use crate::amino::{AminoCodecRegistry, AminoConverter};
use crate::catalog;
use crate::codec::{IntentMessage, MessageCodecRegistry};

/// Both codec tables, built once at start-up and shared read-only (behind an
/// `Arc`) by every orchestrator.
#[derive(Debug, Default)]
pub struct Registry {
    pub messages: MessageCodecRegistry,
    pub amino: AminoCodecRegistry,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the full message catalog.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        catalog::register_defaults(&mut registry);
        registry
    }

    pub fn register<M: IntentMessage + 'static>(&mut self, converter: impl AminoConverter + 'static) {
        self.messages.register_message::<M>();
        self.amino.register(M::TYPE_URL, converter);
    }
}
