use std::str::FromStr;
use std::time::Duration;

use chainboard_signing_core::{
    BroadcastConfig, GasAdjustment, GasConfig, GasPrice, PipelineConfig, PubKeyType,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

fn invalid(var: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        var,
        reason: reason.to_string(),
    }
}

/// Development falls back to the deterministic signer when no wallet bridge
/// is configured; production disables signing instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeProfile {
    #[default]
    Development,
    Production,
}

impl FromStr for RuntimeProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(RuntimeProfile::Development),
            "production" | "prod" => Ok(RuntimeProfile::Production),
            other => Err(format!("unknown runtime profile {other:?}")),
        }
    }
}

/// Signing modes the connected wallet bridge supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletModes {
    pub direct: bool,
    pub amino: bool,
}

impl Default for WalletModes {
    fn default() -> Self {
        Self {
            direct: true,
            amino: true,
        }
    }
}

impl FromStr for WalletModes {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modes = WalletModes {
            direct: false,
            amino: false,
        };
        for mode in s.split(',').map(str::trim).filter(|m| !m.is_empty()) {
            match mode.to_ascii_lowercase().as_str() {
                "direct" => modes.direct = true,
                "amino" => modes.amino = true,
                other => return Err(format!("unknown wallet mode {other:?}")),
            }
        }
        Ok(modes)
    }
}

#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub runtime_profile: RuntimeProfile,
    pub chain_id: String,
    pub rest_url: Option<String>,
    pub wallet_bridge_url: Option<String>,
    pub wallet_modes: WalletModes,
    pub gas_price: String,
    pub gas_adjustment: GasAdjustment,
    pub max_gas: Option<u64>,
    pub pub_key_type: PubKeyType,
    pub http_timeout_ms: u64,
    pub broadcast_timeout_ms: u64,
    pub poll_interval_ms: u64,
    /// Address reported by the deterministic development signer.
    pub dev_address: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            runtime_profile: RuntimeProfile::Development,
            chain_id: "chainboard-1".to_owned(),
            rest_url: None,
            wallet_bridge_url: None,
            wallet_modes: WalletModes::default(),
            gas_price: "0.025uchain".to_owned(),
            gas_adjustment: GasAdjustment::default(),
            max_gas: None,
            pub_key_type: PubKeyType::Secp256k1,
            http_timeout_ms: 15_000,
            broadcast_timeout_ms: 60_000,
            poll_interval_ms: 3_000,
            dev_address: "chain1deterministicdevsigner0000000000000".to_owned(),
        }
    }
}

impl AdapterConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads `CHAINBOARD_*` settings through `lookup`; unset keys keep their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(v) = get("CHAINBOARD_PROFILE") {
            cfg.runtime_profile = v.parse().map_err(|e| invalid("CHAINBOARD_PROFILE", e))?;
        }
        if let Some(v) = get("CHAINBOARD_CHAIN_ID") {
            cfg.chain_id = v;
        }
        if let Some(v) = get("CHAINBOARD_REST_URL") {
            cfg.rest_url = Some(v.trim_end_matches('/').to_owned());
        }
        if let Some(v) = get("CHAINBOARD_WALLET_BRIDGE_URL") {
            cfg.wallet_bridge_url = Some(v);
        }
        if let Some(v) = get("CHAINBOARD_WALLET_MODES") {
            cfg.wallet_modes = v.parse().map_err(|e| invalid("CHAINBOARD_WALLET_MODES", e))?;
        }
        if let Some(v) = get("CHAINBOARD_GAS_PRICE") {
            cfg.gas_price = v;
        }
        if let Some(v) = get("CHAINBOARD_GAS_ADJUSTMENT") {
            cfg.gas_adjustment = v
                .trim()
                .parse()
                .map_err(|e| invalid("CHAINBOARD_GAS_ADJUSTMENT", e))?;
        }
        if let Some(v) = get("CHAINBOARD_MAX_GAS") {
            cfg.max_gas = Some(v.trim().parse().map_err(|e| invalid("CHAINBOARD_MAX_GAS", e))?);
        }
        if let Some(v) = get("CHAINBOARD_PUB_KEY_TYPE") {
            cfg.pub_key_type = match v.trim() {
                "secp256k1" => PubKeyType::Secp256k1,
                "ethsecp256k1" => PubKeyType::EthSecp256k1,
                other => {
                    return Err(invalid(
                        "CHAINBOARD_PUB_KEY_TYPE",
                        format!("unknown key type {other:?}"),
                    ))
                }
            };
        }
        if let Some(v) = get("CHAINBOARD_HTTP_TIMEOUT_MS") {
            cfg.http_timeout_ms = parse_ms("CHAINBOARD_HTTP_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = get("CHAINBOARD_BROADCAST_TIMEOUT_MS") {
            cfg.broadcast_timeout_ms = parse_ms("CHAINBOARD_BROADCAST_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = get("CHAINBOARD_POLL_INTERVAL_MS") {
            cfg.poll_interval_ms = parse_ms("CHAINBOARD_POLL_INTERVAL_MS", &v)?;
        }
        if let Some(v) = get("CHAINBOARD_DEV_ADDRESS") {
            cfg.dev_address = v;
        }
        Ok(cfg)
    }

    pub fn strict_runtime_required(&self) -> bool {
        self.runtime_profile == RuntimeProfile::Production
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    pub fn into_pipeline_config(&self) -> Result<PipelineConfig, ConfigError> {
        let gas_price: GasPrice = self
            .gas_price
            .parse()
            .map_err(|e| invalid("CHAINBOARD_GAS_PRICE", e))?;
        let mut gas = GasConfig::new(gas_price);
        gas.gas_adjustment = self.gas_adjustment.clone();
        gas.max_gas = self.max_gas;

        let mut config = PipelineConfig::new(self.chain_id.clone(), gas);
        config.broadcast = BroadcastConfig {
            timeout: Duration::from_millis(self.broadcast_timeout_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        };
        config.pub_key_type = self.pub_key_type;
        Ok(config)
    }
}

fn parse_ms(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    let ms: u64 = raw.trim().parse().map_err(|e| invalid(var, e))?;
    if ms == 0 {
        return Err(invalid(var, "must be greater than zero"));
    }
    Ok(ms)
}
