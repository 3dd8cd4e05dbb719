//! Deciding what a deploy has to do, given what is already on chain.
//!
//! Pure functions only — no I/O, no async. The decision is made before any
//! transaction is built so a failing policy never leaves partial state.

use deploy_common::{AppDeployMetadata, AppSchema, OnSchemaBreak, OnUpdate, OperationPerformed};

use crate::domain::account::Address;
use crate::domain::error::DeployError;

/// TEAL compiled by algod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledProgram {
    pub bytes: Vec<u8>,
    /// Program address (hash) reported by the compiler.
    pub hash: String,
}

/// The app about to be deployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledApp {
    pub name: String,
    pub approval: CompiledProgram,
    pub clear: CompiledProgram,
    pub schema: AppSchema,
}

/// Bytes per program page; approval and clear share the pages.
pub const PROGRAM_PAGE_SIZE: usize = 2048;
/// Most extra pages an app can request.
pub const MAX_EXTRA_PAGES: u64 = 3;

/// Extra program pages needed to hold both programs, capped at [`MAX_EXTRA_PAGES`].
#[must_use]
pub fn extra_pages(approval_len: usize, clear_len: usize) -> u64 {
    let pages = (approval_len + clear_len).div_ceil(PROGRAM_PAGE_SIZE);
    u64::try_from(pages.saturating_sub(1))
        .map_or(MAX_EXTRA_PAGES, |extra| extra.min(MAX_EXTRA_PAGES))
}

/// An app previously deployed by the same creator under the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingApp {
    pub app_id: u64,
    pub app_address: Address,
    pub created_round: u64,
    pub updated_round: u64,
    pub metadata: AppDeployMetadata,
    pub deleted: bool,
    pub approval_program: Vec<u8>,
    pub clear_program: Vec<u8>,
    pub schema: AppSchema,
}

/// The transactions a deploy will send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployAction {
    /// No live app with this name exists yet.
    Create,
    /// Create a new app next to `existing_app_id`, which stays live.
    Append { existing_app_id: u64 },
    Update { app_id: u64 },
    /// Create a new app and delete `old_app_id` in the same atomic group.
    Replace { old_app_id: u64 },
    Nothing { app_id: u64 },
}

impl DeployAction {
    #[must_use]
    pub fn operation(self) -> OperationPerformed {
        match self {
            Self::Create | Self::Append { .. } => OperationPerformed::Create,
            Self::Update { .. } => OperationPerformed::Update,
            Self::Replace { .. } => OperationPerformed::Replace,
            Self::Nothing { .. } => OperationPerformed::NoOp,
        }
    }
}

/// Decide how to reconcile `target` with `existing` under the given policies.
///
/// Schema breaks are checked before program changes: an app whose storage no
/// longer fits cannot be updated in place whatever `on_update` says.
///
/// # Errors
///
/// Returns an error when the applicable policy is `Fail`.
pub fn plan(
    existing: Option<&ExistingApp>,
    target: &CompiledApp,
    on_update: OnUpdate,
    on_schema_break: OnSchemaBreak,
) -> Result<DeployAction, DeployError> {
    let Some(existing) = existing.filter(|app| !app.deleted) else {
        return Ok(DeployAction::Create);
    };
    let app_id = existing.app_id;

    if target.schema.is_break_from(&existing.schema) {
        return match on_schema_break {
            OnSchemaBreak::Fail => Err(DeployError::SchemaBreak {
                name: target.name.clone(),
                app_id,
                changes: target.schema.describe_growth(&existing.schema).join(", "),
            }),
            OnSchemaBreak::AppendApp => Ok(DeployAction::Append {
                existing_app_id: app_id,
            }),
            OnSchemaBreak::ReplaceApp => Ok(DeployAction::Replace { old_app_id: app_id }),
        };
    }

    let programs_changed = target.approval.bytes != existing.approval_program
        || target.clear.bytes != existing.clear_program;
    if !programs_changed {
        return Ok(DeployAction::Nothing { app_id });
    }

    match on_update {
        OnUpdate::Fail => Err(DeployError::UpdateForbidden {
            name: target.name.clone(),
            app_id,
        }),
        OnUpdate::UpdateApp => Ok(DeployAction::Update { app_id }),
        OnUpdate::ReplaceApp => Ok(DeployAction::Replace { old_app_id: app_id }),
        OnUpdate::AppendApp => Ok(DeployAction::Append {
            existing_app_id: app_id,
        }),
    }
}
