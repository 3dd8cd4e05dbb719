//! The subset of an ARC-56 application specification a deployer needs.
//!
//! Unknown fields are ignored so full specs produced by the compiler parse
//! without modification.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use thiserror::Error;

use crate::schema::{AppSchema, StateSchema};

/// Errors reading an application specification.
#[derive(Debug, Error)]
pub enum Arc56Error {
    #[error("invalid ARC-56 app spec: {0}")]
    Json(#[from] serde_json::Error),

    #[error("app spec '{name}' has no {program} program source")]
    MissingSource { name: String, program: &'static str },

    #[error("{program} program source is not valid base64 UTF-8 TEAL")]
    InvalidSource { program: &'static str },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSpec {
    pub name: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub state: State,
    #[serde(default)]
    pub bare_actions: BareActions,
    #[serde(default)]
    pub source: Option<Source>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub args: Vec<MethodArg>,
    pub returns: MethodReturn,
    #[serde(default)]
    pub desc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MethodArg {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MethodReturn {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct State {
    #[serde(default)]
    pub schema: Schema,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub global: SchemaCounts,
    #[serde(default)]
    pub local: SchemaCounts,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SchemaCounts {
    #[serde(default)]
    pub ints: u64,
    #[serde(default)]
    pub bytes: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BareActions {
    #[serde(default)]
    pub create: Vec<String>,
    #[serde(default)]
    pub call: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    pub approval: String,
    pub clear: String,
}

impl AppSpec {
    /// Parse an ARC-56 JSON document.
    pub fn from_json(json: &str) -> Result<Self, Arc56Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decoded approval program TEAL source.
    pub fn approval_teal(&self) -> Result<String, Arc56Error> {
        self.decode_source("approval", |s| &s.approval)
    }

    /// Decoded clear-state program TEAL source.
    pub fn clear_teal(&self) -> Result<String, Arc56Error> {
        self.decode_source("clear", |s| &s.clear)
    }

    /// Storage reserved at creation time.
    #[must_use]
    pub fn app_schema(&self) -> AppSchema {
        let s = &self.state.schema;
        AppSchema {
            schema: StateSchema {
                global_ints: s.global.ints,
                global_bytes: s.global.bytes,
                local_ints: s.local.ints,
                local_bytes: s.local.bytes,
            },
            extra_pages: 0,
        }
    }

    /// Whether the app can be created with a bare `NoOp` call.
    #[must_use]
    pub fn supports_bare_create(&self) -> bool {
        self.bare_actions.create.iter().any(|a| a == "NoOp")
    }

    /// ABI signature of each method, e.g. `withdraw(uint64)uint64`.
    #[must_use]
    pub fn method_signatures(&self) -> Vec<String> {
        self.methods
            .iter()
            .map(|m| {
                let args: Vec<&str> = m.args.iter().map(|a| a.kind.as_str()).collect();
                format!("{}({}){}", m.name, args.join(","), m.returns.kind)
            })
            .collect()
    }

    fn decode_source(
        &self,
        program: &'static str,
        pick: impl Fn(&Source) -> &String,
    ) -> Result<String, Arc56Error> {
        let source = self.source.as_ref().ok_or_else(|| Arc56Error::MissingSource {
            name: self.name.clone(),
            program,
        })?;
        let bytes = STANDARD
            .decode(pick(source))
            .map_err(|_| Arc56Error::InvalidSource { program })?;
        String::from_utf8(bytes).map_err(|_| Arc56Error::InvalidSource { program })
    }
}
