//! `bank-deploy deploy` — idempotently deploy the Bank app.

use anyhow::{Context, Result};
use clap::Args;
use deploy_common::{OnSchemaBreak, OnUpdate, OperationPerformed};

use crate::application::factory::{AppClient, DeployOptions};
use crate::application::ports::AlgorandNetwork;
use crate::application::services::app_deploy::AppDeployResult;
use crate::application::services::bank_deploy::deploy_bank;
use crate::domain::Address;
use crate::output::OutputContext;

/// Arguments for the deploy command.
#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    /// What to do when the approval or clear program changed
    #[arg(long, value_enum, default_value = "append-app", env = "BANK_ON_UPDATE")]
    pub on_update: OnUpdate,

    /// What to do when the state schema grew
    #[arg(
        long,
        value_enum,
        default_value = "append-app",
        env = "BANK_ON_SCHEMA_BREAK"
    )]
    pub on_schema_break: OnSchemaBreak,

    /// Value substituted for TMPL_UPDATABLE
    #[arg(long, value_name = "BOOL")]
    pub updatable: Option<bool>,

    /// Value substituted for TMPL_DELETABLE
    #[arg(long, value_name = "BOOL")]
    pub deletable: Option<bool>,

    /// Version recorded in the deploy note (default 1.0)
    #[arg(long, value_name = "VERSION")]
    pub app_version: Option<String>,
}

impl DeployArgs {
    fn options(&self) -> DeployOptions {
        DeployOptions {
            on_update: self.on_update,
            on_schema_break: self.on_schema_break,
            version: self.app_version.clone(),
            updatable: self.updatable,
            deletable: self.deletable,
            ..DeployOptions::default()
        }
    }
}

/// Run the deploy command against `network`, sending from `deployer`.
///
/// # Errors
///
/// Returns an error if the deploy fails; nothing is retried.
pub async fn run(
    ctx: &OutputContext,
    args: &DeployArgs,
    json: bool,
    network: &impl AlgorandNetwork,
    deployer: Address,
) -> Result<()> {
    let (client, result) = deploy_bank(network, deployer, args.options()).await?;

    if json {
        let out = serde_json::to_string_pretty(&result).context("JSON serialization failed")?;
        println!("{out}");
        return Ok(());
    }
    print_human(ctx, &client, &result);
    Ok(())
}

fn print_human(ctx: &OutputContext, client: &AppClient, result: &AppDeployResult) {
    match result.operation_performed {
        OperationPerformed::Create | OperationPerformed::Replace => {
            ctx.success(&format!("{} app created", client.app_name));
        }
        OperationPerformed::Update => {
            ctx.success(&format!("{} app updated in place", client.app_name));
        }
        OperationPerformed::NoOp => {
            ctx.info(&format!("{} app is up to date", client.app_name));
        }
    }
    match (result.operation_performed, result.previous_app_id) {
        (OperationPerformed::Replace, Some(previous)) => {
            ctx.warn(&format!("previous app {previous} deleted"));
        }
        (_, Some(previous)) => ctx.warn(&format!("previous app {previous} is still live")),
        (_, None) => {}
    }
    ctx.kv("app id     ", &client.app_id.to_string());
    ctx.kv("address    ", &client.app_address.to_string());
    ctx.kv("version    ", &result.app.version);
}
