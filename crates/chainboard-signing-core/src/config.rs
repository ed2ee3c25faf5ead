use std::time::Duration;

use crate::fee::GasConfig;

/// Default wait for a broadcast transaction to be included in a block.
pub const DEFAULT_BROADCAST_TIMEOUT: Duration = Duration::from_secs(60);

/// Default delay between two inclusion queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PubKeyType {
    #[default]
    Secp256k1,
    /// Ethermint-based chains.
    EthSecp256k1,
}

impl PubKeyType {
    pub fn type_url(&self) -> &'static str {
        match self {
            PubKeyType::Secp256k1 => "/cosmos.crypto.secp256k1.PubKey",
            PubKeyType::EthSecp256k1 => "/ethermint.crypto.v1.ethsecp256k1.PubKey",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_BROADCAST_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub chain_id: String,
    pub gas: GasConfig,
    pub broadcast: BroadcastConfig,
    pub pub_key_type: PubKeyType,
}

impl PipelineConfig {
    pub fn new(chain_id: impl Into<String>, gas: GasConfig) -> Self {
        Self {
            chain_id: chain_id.into(),
            gas,
            broadcast: BroadcastConfig::default(),
            pub_key_type: PubKeyType::default(),
        }
    }
}
