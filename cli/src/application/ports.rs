//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::domain::{Address, AppCall, CompiledProgram, Confirmation, ExistingApp};

// ── Compilation Port ──────────────────────────────────────────────────────────

/// Turns TEAL source into program bytes.
#[allow(async_fn_in_trait)]
pub trait TealCompiler {
    /// Compile TEAL source, returning bytecode and program hash.
    async fn compile(&self, teal: &str) -> Result<CompiledProgram>;
}

// ── Lookup Port ───────────────────────────────────────────────────────────────

/// Finds apps a creator previously deployed, keyed by deploy metadata name.
#[allow(async_fn_in_trait)]
pub trait AppLookup {
    /// All apps created by `creator` that carry deploy metadata.
    ///
    /// When several apps share a name the most recently created one wins,
    /// including deleted ones.
    async fn created_apps(&self, creator: &Address) -> Result<BTreeMap<String, ExistingApp>>;
}

// ── Transaction Port ──────────────────────────────────────────────────────────

/// Signs, submits and awaits application calls.
#[allow(async_fn_in_trait)]
pub trait TransactionSender {
    /// Send `calls` as one atomic group (a single call is sent on its own)
    /// and wait for confirmation. Confirmations are returned in call order.
    ///
    /// # Errors
    ///
    /// Returns an error if no signer is registered for a sender, the node
    /// rejects the group, or it is not confirmed in time.
    async fn send_group(&self, calls: &[AppCall]) -> Result<Vec<Confirmation>>;
}

// ── Composite ─────────────────────────────────────────────────────────────────

/// Composite trait — everything an app factory needs from the network.
pub trait AlgorandNetwork: TealCompiler + AppLookup + TransactionSender {}

/// Blanket implementation: any type implementing all three ports is an `AlgorandNetwork`.
impl<T> AlgorandNetwork for T where T: TealCompiler + AppLookup + TransactionSender {}
