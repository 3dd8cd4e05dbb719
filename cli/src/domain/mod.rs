//! Domain layer — pure deploy logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `reqwest`, or `std::env`.
//! All functions are synchronous and take data in, returning data out.

pub mod account;
pub mod config;
pub mod deploy;
pub mod error;
pub mod template;
pub mod transaction;

pub use account::{Address, DeployerAccount};
pub use config::{DEPLOYER_ACCOUNT, DeployConfig, NetworkConfig, ServiceConfig};
pub use deploy::{CompiledApp, CompiledProgram, DeployAction, ExistingApp, extra_pages, plan};
pub use error::{AccountError, ConfigError, DeployError, NetworkError, TemplateError};
pub use template::DeployControls;
pub use transaction::{AppCall, Confirmation, OnComplete, SuggestedParams};
