//! Unit tests for loading deploy configuration from the process environment.
//!
//! IMPORTANT: These tests mutate process env vars and are serialized with
//! `serial_test` to avoid races with each other.

#![allow(clippy::expect_used, clippy::unwrap_used, unsafe_code)]

use bank_deploy::domain::{ConfigError, DeployerAccount, NetworkConfig};
use bank_deploy::infra::config::load_from_env;
use serial_test::serial;

const KEYS: &[&str] = &[
    "DEPLOYER_MNEMONIC",
    "DEPLOYER_SENDER",
    "ALGOD_SERVER",
    "ALGOD_PORT",
    "ALGOD_TOKEN",
    "INDEXER_SERVER",
    "INDEXER_PORT",
    "INDEXER_TOKEN",
];

/// Set `pairs` after clearing every key the loader reads.
fn set_env(pairs: &[(&str, &str)]) {
    // SAFETY: every test touching these vars is #[serial].
    unsafe {
        for key in KEYS {
            std::env::remove_var(key);
        }
        for (key, value) in pairs {
            std::env::set_var(key, value);
        }
    }
}

#[test]
#[serial]
fn deployer_mnemonic_is_read_from_env() {
    let account = DeployerAccount::from_seed([42u8; 32]);
    set_env(&[("DEPLOYER_MNEMONIC", &account.to_mnemonic())]);

    let config = load_from_env().unwrap();
    assert_eq!(config.deployer.address(), account.address());
    assert_eq!(config.network, NetworkConfig::localnet());
    set_env(&[]);
}

#[test]
#[serial]
fn missing_deployer_fails() {
    set_env(&[
        ("ALGOD_SERVER", "https://testnet-api.algonode.cloud"),
        ("INDEXER_SERVER", "https://testnet-idx.algonode.cloud"),
    ]);

    let err = load_from_env().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::MissingAccount { .. })
    ));
    set_env(&[]);
}

#[test]
#[serial]
fn algod_server_requires_indexer_server() {
    let account = DeployerAccount::from_seed([42u8; 32]);
    set_env(&[
        ("DEPLOYER_MNEMONIC", &account.to_mnemonic()),
        ("ALGOD_SERVER", "https://testnet-api.algonode.cloud"),
    ]);

    let err = load_from_env().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::MissingIndexer)
    ));
    set_env(&[]);
}
