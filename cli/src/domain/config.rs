//! Domain types and validators for deploy configuration.
//!
//! Pure functions only — no I/O, no async, no environment access. Loading
//! from the process environment lives in `crate::infra::config`.

use crate::domain::account::DeployerAccount;
use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Name of the account that authors deploy transactions.
pub const DEPLOYER_ACCOUNT: &str = "DEPLOYER";

pub const LOCALNET_SERVER: &str = "http://localhost";
pub const LOCALNET_ALGOD_PORT: u16 = 4001;
pub const LOCALNET_INDEXER_PORT: u16 = 8980;

/// Default API token of an AlgoKit LocalNet sandbox.
pub const LOCALNET_TOKEN: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

// ── Config schema ────────────────────────────────────────────────────────────

/// Connection parameters for one Algorand HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Scheme and host, e.g. `https://testnet-api.algonode.cloud`.
    pub server: String,
    pub port: Option<u16>,
    pub token: String,
}

impl ServiceConfig {
    /// Base URL with the port appended when one is configured.
    #[must_use]
    pub fn base_url(&self) -> String {
        let server = self.server.trim_end_matches('/');
        match self.port {
            Some(port) => format!("{server}:{port}"),
            None => server.to_string(),
        }
    }
}

/// Where the deployer sends requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub algod: ServiceConfig,
    pub indexer: ServiceConfig,
}

impl NetworkConfig {
    /// AlgoKit LocalNet defaults, used when no `ALGOD_SERVER` is configured.
    #[must_use]
    pub fn localnet() -> Self {
        Self {
            algod: ServiceConfig {
                server: LOCALNET_SERVER.to_string(),
                port: Some(LOCALNET_ALGOD_PORT),
                token: LOCALNET_TOKEN.to_string(),
            },
            indexer: ServiceConfig {
                server: LOCALNET_SERVER.to_string(),
                port: Some(LOCALNET_INDEXER_PORT),
                token: LOCALNET_TOKEN.to_string(),
            },
        }
    }
}

/// Fully validated configuration for one deploy invocation.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub network: NetworkConfig,
    pub deployer: DeployerAccount,
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates that a server value is an absolute http(s) URL.
///
/// # Errors
///
/// Returns an error if the scheme is missing or unsupported.
pub fn validate_server(key: &'static str, value: &str) -> Result<(), ConfigError> {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            hint: "Expected an http:// or https:// URL.",
        }),
    }
}

/// Parses a port value; empty strings mean "no port".
///
/// # Errors
///
/// Returns an error if the value is not a valid TCP port.
pub fn parse_port(key: &'static str, value: Option<&str>) -> Result<Option<u16>, ConfigError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            hint: "Expected a port number between 0 and 65535.",
        }),
    }
}
