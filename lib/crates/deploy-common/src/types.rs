use std::fmt;

use serde::{Deserialize, Serialize};

/// What to do when the deployed app's programs differ from the ones being deployed
/// but the storage schema is still compatible.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OnUpdate {
    /// Abort the deployment.
    Fail,
    /// Send an `UpdateApplication` call to the existing app.
    UpdateApp,
    /// Create a new app and delete the existing one.
    ReplaceApp,
    /// Create a new app and leave the existing one in place.
    #[default]
    AppendApp,
}

/// What to do when the new storage schema cannot fit in the deployed app.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OnSchemaBreak {
    /// Abort the deployment.
    Fail,
    /// Create a new app and delete the existing one.
    ReplaceApp,
    /// Create a new app and leave the existing one in place.
    #[default]
    AppendApp,
}

/// What a deploy call actually did on chain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationPerformed {
    /// A new app was created (first deploy or append).
    Create,
    /// The existing app was updated in place.
    Update,
    /// A new app was created and the previous one deleted.
    Replace,
    /// Nothing changed, no transaction was sent.
    NoOp,
}

impl OperationPerformed {
    /// Whether this outcome produced a new app id worth announcing.
    #[must_use]
    pub fn created_new_app(self) -> bool {
        matches!(self, Self::Create | Self::Replace)
    }
}

impl fmt::Display for OperationPerformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Replace => "replace",
            Self::NoOp => "no-op",
        })
    }
}

/// A compile-time value substituted into a `TMPL_<NAME>` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateValue {
    Int(u64),
    Bytes(Vec<u8>),
}
