//! Deploy metadata carried in the note field of create and update transactions.
//!
//! Notes follow ARC-2: `<dapp-name>:<format><payload>`, here always
//! `ALGOKIT_DEPLOYER:j{...json...}` so apps deployed by other AlgoKit tooling
//! are recognised and vice versa.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ARC-2 dapp name used to tag deployer notes.
pub const APP_DEPLOY_NOTE_DAPP: &str = "ALGOKIT_DEPLOYER";

/// Errors decoding a deploy note.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("note is not a {APP_DEPLOY_NOTE_DAPP} JSON note")]
    WrongPrefix,

    #[error("invalid deploy metadata JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Name, version and mutability flags of a deployed application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDeployMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub deletable: Option<bool>,
    #[serde(default)]
    pub updatable: Option<bool>,
}

impl AppDeployMetadata {
    /// Note prefix every deployer note starts with.
    #[must_use]
    pub fn note_prefix() -> String {
        format!("{APP_DEPLOY_NOTE_DAPP}:j")
    }

    /// Encode as an ARC-2 note.
    #[must_use]
    pub fn to_note(&self) -> Vec<u8> {
        // Serialising a struct of strings and bools cannot fail.
        let json = serde_json::to_string(self).unwrap_or_default();
        format!("{}{json}", Self::note_prefix()).into_bytes()
    }

    /// Decode an ARC-2 note produced by [`to_note`](Self::to_note).
    pub fn from_note(note: &[u8]) -> Result<Self, MetadataError> {
        let prefix = Self::note_prefix();
        let payload = note
            .strip_prefix(prefix.as_bytes())
            .ok_or(MetadataError::WrongPrefix)?;
        Ok(serde_json::from_slice(payload)?)
    }
}
