//! Loads [`DeployConfig`] from environment variables via `envy`.
//!
//! Network variables (all optional, LocalNet when `ALGOD_SERVER` is unset):
//!   - `ALGOD_SERVER`, `ALGOD_PORT`, `ALGOD_TOKEN`
//!   - `INDEXER_SERVER`, `INDEXER_PORT`, `INDEXER_TOKEN`
//!
//! Account variables for an account named `NAME`:
//!   - `NAME_MNEMONIC` (required, 25 words)
//!   - `NAME_SENDER`   (optional, address the key signs for after a rekey)

use std::ffi::OsString;
use std::str::FromStr as _;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::config::{parse_port, validate_server};
use crate::domain::{
    Address, ConfigError, DEPLOYER_ACCOUNT, DeployConfig, DeployerAccount, NetworkConfig,
    ServiceConfig,
};

#[derive(Debug, Default, Deserialize)]
struct NetworkEnv {
    algod_server: Option<String>,
    algod_port: Option<String>,
    algod_token: Option<String>,
    indexer_server: Option<String>,
    indexer_port: Option<String>,
    indexer_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AccountEnv {
    mnemonic: Option<String>,
    sender: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Read the deploy configuration from the process environment.
///
/// Variables whose name or value is not UTF-8 are skipped.
///
/// # Errors
///
/// Returns an error if the deployer account is missing or any value is invalid.
pub fn load_from_env() -> Result<DeployConfig> {
    load_from_iter(utf8_vars(std::env::vars_os()))
}

fn utf8_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

/// Read the deploy configuration from `vars` instead of the process environment.
///
/// # Errors
///
/// Returns an error if the deployer account is missing or any value is invalid.
pub fn load_from_iter<I>(vars: I) -> Result<DeployConfig>
where
    I: IntoIterator<Item = (String, String)>,
{
    let vars: Vec<(String, String)> = vars.into_iter().collect();
    let deployer = account_from_iter(DEPLOYER_ACCOUNT, vars.iter().cloned())?;
    let network = network_from_iter(vars)?;
    Ok(DeployConfig { network, deployer })
}

/// Resolve the account `name` from `NAME_MNEMONIC` and `NAME_SENDER`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingAccount`] when no mnemonic is set and
/// [`ConfigError::InvalidAccount`] when the mnemonic or sender is malformed.
pub fn account_from_iter<I>(name: &str, vars: I) -> Result<DeployerAccount>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env: AccountEnv = envy::prefixed(format!("{name}_"))
        .from_iter(vars)
        .with_context(|| format!("failed to read {name}_* env vars"))?;

    let Some(mnemonic) = non_empty(env.mnemonic) else {
        return Err(ConfigError::MissingAccount {
            name: name.to_string(),
        }
        .into());
    };
    let invalid = |source| ConfigError::InvalidAccount {
        name: name.to_string(),
        source,
    };

    let account = DeployerAccount::from_mnemonic(&mnemonic).map_err(invalid)?;
    match non_empty(env.sender) {
        Some(sender) => {
            let sender = Address::from_str(sender.trim()).map_err(invalid)?;
            Ok(account.with_sender(sender))
        }
        None => Ok(account),
    }
}

/// Resolve algod and indexer connection settings.
///
/// # Errors
///
/// Returns [`ConfigError::MissingIndexer`] when only algod is configured and
/// [`ConfigError::InvalidValue`] for malformed servers or ports.
pub fn network_from_iter<I>(vars: I) -> Result<NetworkConfig>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env: NetworkEnv = envy::from_iter(vars).context("failed to read network env vars")?;

    let Some(algod_server) = non_empty(env.algod_server) else {
        tracing::debug!("ALGOD_SERVER not set, using LocalNet");
        return Ok(NetworkConfig::localnet());
    };
    let indexer_server = non_empty(env.indexer_server).ok_or(ConfigError::MissingIndexer)?;

    validate_server("ALGOD_SERVER", &algod_server)?;
    validate_server("INDEXER_SERVER", &indexer_server)?;

    Ok(NetworkConfig {
        algod: ServiceConfig {
            server: algod_server,
            port: parse_port("ALGOD_PORT", env.algod_port.as_deref())?,
            token: env.algod_token.unwrap_or_default(),
        },
        indexer: ServiceConfig {
            server: indexer_server,
            port: parse_port("INDEXER_PORT", env.indexer_port.as_deref())?,
            token: env.indexer_token.unwrap_or_default(),
        },
    })
}
