//! Application service — idempotent app deploy use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use deploy_common::{
    AppDeployMetadata, AppSpec, OnSchemaBreak, OnUpdate, OperationPerformed, TemplateValue,
};
use serde::Serialize;

use crate::application::ports::{AppLookup, TealCompiler, TransactionSender};
use crate::domain::template::{self, DeployControls};
use crate::domain::{
    Address, AppCall, CompiledApp, Confirmation, DeployAction, DeployError, ExistingApp, extra_pages,
    plan,
};

/// Version recorded in deploy metadata when none is given.
pub const DEFAULT_APP_VERSION: &str = "1.0";

/// Everything needed to deploy one app spec for one creator.
pub struct DeployRequest<'a> {
    pub spec: &'a AppSpec,
    pub creator: Address,
    pub version: String,
    pub on_update: OnUpdate,
    pub on_schema_break: OnSchemaBreak,
    pub controls: DeployControls,
    pub template_params: BTreeMap<String, TemplateValue>,
}

/// The app that is live after a deploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployedApp {
    pub app_id: u64,
    pub app_address: Address,
    pub name: String,
    pub version: String,
    pub updatable: Option<bool>,
    pub deletable: Option<bool>,
}

/// Outcome of a deploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppDeployResult {
    pub operation_performed: OperationPerformed,
    pub app: DeployedApp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_tx_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_tx_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_tx_id: Option<String>,
    /// App left behind (append) or deleted (replace), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_app_id: Option<u64>,
}

/// Deploy `request.spec`, creating, updating, replacing or leaving the app
/// alone according to what is already on chain and the request's policies.
///
/// At most one transaction group is sent.
///
/// # Errors
///
/// Returns an error if templates cannot be resolved, compilation or lookup
/// fails, a `Fail` policy applies, or the transaction group is rejected.
pub async fn deploy_app(
    compiler: &impl TealCompiler,
    lookup: &impl AppLookup,
    sender: &impl TransactionSender,
    request: DeployRequest<'_>,
) -> Result<AppDeployResult> {
    let target = compile_app(compiler, &request).await?;

    let existing_apps = lookup
        .created_apps(&request.creator)
        .await
        .with_context(|| format!("looking up existing apps for {}", request.creator))?;
    let existing = existing_apps.get(&target.name);
    if let Some(app) = existing {
        tracing::debug!(
            app_id = app.app_id,
            version = %app.metadata.version,
            updated_round = app.updated_round,
            deleted = app.deleted,
            "existing app found"
        );
    }

    let action = plan(existing, &target, request.on_update, request.on_schema_break)?;
    tracing::debug!(?action, "deploy plan");

    let metadata = AppDeployMetadata {
        name: target.name.clone(),
        version: request.version.clone(),
        deletable: request.controls.deletable,
        updatable: request.controls.updatable,
    };

    match action {
        DeployAction::Create => create(sender, &request, &target, metadata, None).await,
        DeployAction::Append { existing_app_id } => {
            tracing::warn!(
                existing_app_id,
                "deploying a new app alongside the existing one"
            );
            create(sender, &request, &target, metadata, Some(existing_app_id)).await
        }
        DeployAction::Update { app_id } => update(sender, &request, &target, metadata, app_id).await,
        DeployAction::Replace { old_app_id } => {
            replace(sender, &request, &target, metadata, old_app_id).await
        }
        DeployAction::Nothing { app_id } => {
            tracing::debug!(app_id, "no detected changes in app, nothing to do");
            // `existing` is always set when the plan is Nothing.
            let app = existing.map_or_else(
                || deployed_from_metadata(app_id, &metadata),
                deployed_from_existing,
            );
            Ok(AppDeployResult {
                operation_performed: OperationPerformed::NoOp,
                app,
                create_tx_id: None,
                update_tx_id: None,
                delete_tx_id: None,
                previous_app_id: None,
            })
        }
    }
}

async fn compile_app(
    compiler: &impl TealCompiler,
    request: &DeployRequest<'_>,
) -> Result<CompiledApp> {
    let spec = request.spec;
    let approval_teal = template::substitute(
        &spec.approval_teal()?,
        &request.template_params,
        request.controls,
    )?;
    let clear_teal = template::substitute(
        &spec.clear_teal()?,
        &request.template_params,
        request.controls,
    )?;

    let approval = compiler
        .compile(&approval_teal)
        .await
        .context("compiling approval program")?;
    let clear = compiler
        .compile(&clear_teal)
        .await
        .context("compiling clear state program")?;

    tracing::debug!(
        approval_hash = %approval.hash,
        clear_hash = %clear.hash,
        methods = ?spec.method_signatures(),
        "compiled {}",
        spec.name
    );

    let mut schema = spec.app_schema();
    schema.extra_pages = extra_pages(approval.bytes.len(), clear.bytes.len());
    Ok(CompiledApp {
        name: spec.name.clone(),
        approval,
        clear,
        schema,
    })
}

fn create_call(
    request: &DeployRequest<'_>,
    target: &CompiledApp,
    metadata: &AppDeployMetadata,
) -> Result<AppCall> {
    if !request.spec.supports_bare_create() {
        return Err(DeployError::NoBareCreate(target.name.clone()).into());
    }
    Ok(AppCall::create(
        request.creator,
        target.approval.bytes.clone(),
        target.clear.bytes.clone(),
        target.schema,
        metadata.to_note(),
    ))
}

fn created_app_id(confirmation: &Confirmation) -> Result<u64> {
    confirmation
        .app_id
        .ok_or_else(|| DeployError::MissingAppId(confirmation.tx_id.clone()).into())
}

fn deployed_from_metadata(app_id: u64, metadata: &AppDeployMetadata) -> DeployedApp {
    DeployedApp {
        app_id,
        app_address: Address::for_application(app_id),
        name: metadata.name.clone(),
        version: metadata.version.clone(),
        updatable: metadata.updatable,
        deletable: metadata.deletable,
    }
}

fn deployed_from_existing(app: &ExistingApp) -> DeployedApp {
    DeployedApp {
        app_id: app.app_id,
        app_address: app.app_address,
        name: app.metadata.name.clone(),
        version: app.metadata.version.clone(),
        updatable: app.metadata.updatable,
        deletable: app.metadata.deletable,
    }
}

async fn create(
    sender: &impl TransactionSender,
    request: &DeployRequest<'_>,
    target: &CompiledApp,
    metadata: AppDeployMetadata,
    previous_app_id: Option<u64>,
) -> Result<AppDeployResult> {
    let call = create_call(request, target, &metadata)?;
    let confirmations = sender
        .send_group(&[call])
        .await
        .with_context(|| format!("creating app '{}'", target.name))?;
    let confirmation = confirmations
        .first()
        .context("create transaction returned no confirmation")?;
    let app_id = created_app_id(confirmation)?;

    Ok(AppDeployResult {
        operation_performed: OperationPerformed::Create,
        app: deployed_from_metadata(app_id, &metadata),
        create_tx_id: Some(confirmation.tx_id.clone()),
        update_tx_id: None,
        delete_tx_id: None,
        previous_app_id,
    })
}

async fn update(
    sender: &impl TransactionSender,
    request: &DeployRequest<'_>,
    target: &CompiledApp,
    metadata: AppDeployMetadata,
    app_id: u64,
) -> Result<AppDeployResult> {
    let call = AppCall::update(
        request.creator,
        app_id,
        target.approval.bytes.clone(),
        target.clear.bytes.clone(),
        metadata.to_note(),
    );
    let confirmations = sender
        .send_group(&[call])
        .await
        .with_context(|| format!("updating app {app_id}"))?;
    let tx_id = confirmations.first().map(|c| c.tx_id.clone());

    Ok(AppDeployResult {
        operation_performed: OperationPerformed::Update,
        app: deployed_from_metadata(app_id, &metadata),
        create_tx_id: None,
        update_tx_id: tx_id,
        delete_tx_id: None,
        previous_app_id: None,
    })
}

async fn replace(
    sender: &impl TransactionSender,
    request: &DeployRequest<'_>,
    target: &CompiledApp,
    metadata: AppDeployMetadata,
    old_app_id: u64,
) -> Result<AppDeployResult> {
    tracing::warn!(old_app_id, "replacing app: the existing app will be deleted");
    let calls = [
        create_call(request, target, &metadata)?,
        AppCall::delete(request.creator, old_app_id),
    ];
    let confirmations = sender
        .send_group(&calls)
        .await
        .with_context(|| format!("replacing app {old_app_id}"))?;
    let [create_confirmation, delete_confirmation] = confirmations.as_slice() else {
        anyhow::bail!(
            "replace group returned {} confirmations, expected 2",
            confirmations.len()
        );
    };
    let app_id = created_app_id(create_confirmation)?;

    Ok(AppDeployResult {
        operation_performed: OperationPerformed::Replace,
        app: deployed_from_metadata(app_id, &metadata),
        create_tx_id: Some(create_confirmation.tx_id.clone()),
        update_tx_id: None,
        delete_tx_id: Some(delete_confirmation.tx_id.clone()),
        previous_app_id: Some(old_app_id),
    })
}
