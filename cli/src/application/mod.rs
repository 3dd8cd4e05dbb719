//! Application layer — port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain` and `crate::contracts` — never
//! on `crate::infra`, `crate::commands`, or `crate::output`.

pub mod factory;
pub mod ports;
pub mod services;

pub use factory::{AppClient, AppDefinition, AppFactory, DeployOptions, TypedAppFactories};
pub use ports::{AlgorandNetwork, AppLookup, TealCompiler, TransactionSender};
