//! CLI argument parsing with clap derive

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::commands;
use crate::infra::algorand::AlgorandClient;
use crate::infra::config;
use crate::output::OutputContext;

/// Deploy the Bank application to an Algorand network
#[derive(Parser)]
#[command(
    name = "bank-deploy",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create, update or keep the Bank app for the DEPLOYER account
    Deploy(commands::deploy::DeployArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            no_color,
            quiet,
            json,
            command,
        } = self;
        match command {
            Command::Version => commands::version::run(json),
            Command::Deploy(args) => {
                let ctx = OutputContext::new(no_color, quiet);
                let config = config::load_from_env()?;
                let deployer = config.deployer.address();
                tracing::debug!(
                    %deployer,
                    algod = %config.network.algod.base_url(),
                    indexer = %config.network.indexer.base_url(),
                    "configuration loaded"
                );
                let network = AlgorandClient::from_config(&config.network)
                    .context("failed to set up Algorand clients")?
                    .with_signer(config.deployer);
                commands::deploy::run(&ctx, &args, json, &network, deployer).await
            }
        }
    }
}
