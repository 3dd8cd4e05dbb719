//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio` or `reqwest`. All error types implement
//! `thiserror::Error` and convert to `anyhow::Error` via the `?` operator.

use thiserror::Error;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while reading deploy configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Missing account '{name}': set {name}_MNEMONIC to the 25-word mnemonic of the {name} account."
    )]
    MissingAccount { name: String },

    #[error("Invalid account '{name}': {source}")]
    InvalidAccount {
        name: String,
        #[source]
        source: AccountError,
    },

    #[error("INDEXER_SERVER must be set when ALGOD_SERVER is set (existing apps are looked up through the indexer).")]
    MissingIndexer,

    #[error("Invalid value for {key}: {value}\n\n{hint}")]
    InvalidValue {
        key: &'static str,
        value: String,
        hint: &'static str,
    },
}

// ── Account errors ────────────────────────────────────────────────────────────

/// Errors decoding addresses and mnemonics.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("address must be 58 base32 characters, got {0}")]
    AddressLength(usize),

    #[error("address is not valid base32")]
    AddressEncoding,

    #[error("address checksum does not match")]
    AddressChecksum,

    #[error("mnemonic must have 25 words, got {0}")]
    MnemonicLength(usize),

    #[error("mnemonic word '{0}' is not in the word list")]
    UnknownWord(String),

    #[error("mnemonic checksum word does not match")]
    MnemonicChecksum,
}

// ── Template errors ───────────────────────────────────────────────────────────

/// Errors substituting deploy-time parameters into TEAL.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("TEAL uses {0} but the deploy did not set --updatable")]
    UpdatableNotSet(String),

    #[error("TEAL uses {0} but the deploy did not set --deletable")]
    DeletableNotSet(String),

    #[error("TEAL template variable {0} has no value")]
    Unresolved(String),
}

// ── Deploy errors ─────────────────────────────────────────────────────────────

/// Errors deciding or executing a deployment.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error(
        "Schema break detected for app '{name}' ({app_id}): {changes}. Deploy with --on-schema-break append-app or replace-app."
    )]
    SchemaBreak {
        name: String,
        app_id: u64,
        changes: String,
    },

    #[error(
        "Update detected for app '{name}' ({app_id}) but on-update is fail. Deploy with --on-update update-app, replace-app or append-app."
    )]
    UpdateForbidden { name: String, app_id: u64 },

    #[error("App '{0}' has no bare NoOp create action; only bare creates are supported.")]
    NoBareCreate(String),

    #[error("Create transaction {0} was confirmed without an application id.")]
    MissingAppId(String),

    #[error("No signer registered for sender {0}.")]
    NoSigner(String),
}

// ── Network errors ────────────────────────────────────────────────────────────

/// Errors talking to algod or the indexer.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("transaction {tx_id} was rejected: {reason}")]
    Rejected { tx_id: String, reason: String },

    #[error("transaction {tx_id} not confirmed after {rounds} rounds")]
    NotConfirmed { tx_id: String, rounds: u64 },
}
