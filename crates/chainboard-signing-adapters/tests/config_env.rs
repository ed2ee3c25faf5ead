use std::collections::HashMap;
use std::time::Duration;

use chainboard_signing_adapters::{AdapterConfig, RuntimeProfile, WalletModes};
use chainboard_signing_core::fee::adjusted_gas_limit;
use chainboard_signing_core::PubKeyType;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_apply_when_nothing_is_set() {
    let cfg = AdapterConfig::from_lookup(lookup(&[])).expect("config");
    assert_eq!(cfg.runtime_profile, RuntimeProfile::Development);
    assert!(cfg.rest_url.is_none());
    assert_eq!(cfg.wallet_modes, WalletModes::default());

    let pipeline = cfg.into_pipeline_config().expect("pipeline config");
    assert_eq!(pipeline.chain_id, "chainboard-1");
    assert_eq!(pipeline.gas.gas_adjustment.to_string(), "1.5");
    assert_eq!(pipeline.broadcast.timeout, Duration::from_secs(60));
    assert_eq!(pipeline.broadcast.poll_interval, Duration::from_secs(3));
}

#[test]
fn environment_overrides_are_parsed() {
    let cfg = AdapterConfig::from_lookup(lookup(&[
        ("CHAINBOARD_PROFILE", "production"),
        ("CHAINBOARD_CHAIN_ID", "evmos_9001-2"),
        ("CHAINBOARD_REST_URL", "https://rest.example.org/"),
        ("CHAINBOARD_WALLET_MODES", "amino"),
        ("CHAINBOARD_GAS_PRICE", "25000000000aevmos"),
        ("CHAINBOARD_GAS_ADJUSTMENT", "1.3"),
        ("CHAINBOARD_MAX_GAS", "2000000"),
        ("CHAINBOARD_PUB_KEY_TYPE", "ethsecp256k1"),
        ("CHAINBOARD_BROADCAST_TIMEOUT_MS", "90000"),
        ("CHAINBOARD_POLL_INTERVAL_MS", "1500"),
    ]))
    .expect("config");

    assert!(cfg.strict_runtime_required());
    assert_eq!(cfg.rest_url.as_deref(), Some("https://rest.example.org"));
    assert_eq!(
        cfg.wallet_modes,
        WalletModes {
            direct: false,
            amino: true
        }
    );

    let pipeline = cfg.into_pipeline_config().expect("pipeline config");
    assert_eq!(pipeline.chain_id, "evmos_9001-2");
    assert_eq!(pipeline.gas.gas_price.denom, "aevmos");
    assert_eq!(pipeline.gas.max_gas, Some(2_000_000));
    assert_eq!(
        adjusted_gas_limit(100_000, pipeline.gas.gas_adjustment.ratio()),
        130_000
    );
    assert_eq!(pipeline.pub_key_type, PubKeyType::EthSecp256k1);
    assert_eq!(pipeline.broadcast.timeout, Duration::from_millis(90_000));
    assert_eq!(pipeline.broadcast.poll_interval, Duration::from_millis(1_500));
}

#[test]
fn invalid_values_name_the_variable() {
    let err = AdapterConfig::from_lookup(lookup(&[("CHAINBOARD_WALLET_MODES", "direct,ledger")]))
        .expect_err("unknown mode");
    assert!(err.to_string().contains("CHAINBOARD_WALLET_MODES"));

    let err = AdapterConfig::from_lookup(lookup(&[("CHAINBOARD_POLL_INTERVAL_MS", "0")]))
        .expect_err("zero interval");
    assert!(err.to_string().contains("CHAINBOARD_POLL_INTERVAL_MS"));

    let cfg = AdapterConfig::from_lookup(lookup(&[("CHAINBOARD_GAS_PRICE", "cheap")]))
        .expect("gas price is checked lazily");
    let err = cfg.into_pipeline_config().expect_err("bad gas price");
    assert!(err.to_string().contains("CHAINBOARD_GAS_PRICE"));

    let err = AdapterConfig::from_lookup(lookup(&[("CHAINBOARD_GAS_ADJUSTMENT", "-1")]))
        .expect_err("negative adjustment");
    assert!(err.to_string().contains("CHAINBOARD_GAS_ADJUSTMENT"));
}
