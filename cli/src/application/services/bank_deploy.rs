//! Application service — deploy the Bank app and announce new instances.
//!
//! Imports only from `crate::domain`, `crate::contracts` and
//! `crate::application`. All I/O is routed through the injected network port.

use anyhow::Result;
use deploy_common::OperationPerformed;

use crate::application::factory::{AppClient, DeployOptions, TypedAppFactories};
use crate::application::ports::AlgorandNetwork;
use crate::application::services::app_deploy::AppDeployResult;
use crate::contracts::Bank;
use crate::domain::Address;

/// Log line announcing a newly created app, or `None` when nothing new was created.
///
/// Only `Create` and `Replace` produce a new app id; `Update` and `NoOp`
/// leave the previously announced app in place.
#[must_use]
pub fn announcement(client: &AppClient, operation: OperationPerformed) -> Option<String> {
    operation.created_new_app().then(|| {
        format!(
            "Deployed {} app {} to address {}",
            client.app_name, client.app_id, client.app_address
        )
    })
}

/// Deploy the Bank app from `deployer` and log where a new instance landed.
///
/// Makes exactly one deploy attempt. Errors are returned unchanged.
///
/// # Errors
///
/// Returns an error if the Bank spec fails to load or the deploy fails.
pub async fn deploy_bank(
    network: &impl AlgorandNetwork,
    deployer: Address,
    options: DeployOptions,
) -> Result<(AppClient, AppDeployResult)> {
    let factory = network.get_typed_app_factory::<Bank>(deployer)?;
    let (app_client, result) = factory.deploy(options).await?;

    if let Some(line) = announcement(&app_client, result.operation_performed) {
        tracing::info!("{line}");
    }

    Ok((app_client, result))
}
