pub mod config;
pub mod deterministic;
pub mod rest;
pub mod wallet_bridge;

pub use config::{AdapterConfig, ConfigError, RuntimeProfile, WalletModes};
pub use deterministic::DeterministicSigner;
pub use rest::NodeRestAdapter;
pub use wallet_bridge::WalletBridgeSigner;
