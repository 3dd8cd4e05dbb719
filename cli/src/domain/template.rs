//! Deploy-time substitution of `TMPL_*` placeholders in TEAL source.
//!
//! Pure functions only — no I/O, no async.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::LazyLock;

use deploy_common::TemplateValue;
use regex::{Captures, Regex};

use crate::domain::error::TemplateError;

pub const UPDATABLE_TEMPLATE: &str = "TMPL_UPDATABLE";
pub const DELETABLE_TEMPLATE: &str = "TMPL_DELETABLE";

static TEMPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern — cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"\bTMPL_[A-Za-z0-9_]+\b").expect("valid regex")
});

/// Deploy-time mutability controls baked into the approval program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeployControls {
    pub updatable: Option<bool>,
    pub deletable: Option<bool>,
}

/// A run of one TEAL line, as far as template substitution is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Code(&'a str),
    /// A `"..."` literal, quotes included; left untouched.
    Literal(&'a str),
    /// Everything from `//` to the end of the line.
    Comment(&'a str),
}

/// Split a TEAL line into code, string literals and a trailing comment.
/// `//` inside a string literal does not start a comment.
fn segments(line: &str) -> Vec<Segment<'_>> {
    let bytes = line.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &c) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == b'\\' {
                escaped = true;
            } else if c == b'"' {
                in_string = false;
                out.push(Segment::Literal(&line[start..=i]));
                start = i + 1;
            }
        } else if c == b'"' {
            out.push(Segment::Code(&line[start..i]));
            in_string = true;
            start = i;
        } else if c == b'/' && bytes.get(i + 1) == Some(&b'/') {
            out.push(Segment::Code(&line[start..i]));
            out.push(Segment::Comment(&line[i..]));
            return out;
        }
    }
    let rest = &line[start..];
    out.push(if in_string {
        Segment::Literal(rest)
    } else {
        Segment::Code(rest)
    });
    out
}

fn render(value: &TemplateValue) -> String {
    match value {
        TemplateValue::Int(n) => n.to_string(),
        TemplateValue::Bytes(bytes) => {
            let mut out = String::with_capacity(2 + bytes.len() * 2);
            out.push_str("0x");
            for b in bytes {
                let _ = write!(out, "{b:02x}");
            }
            out
        }
    }
}

/// Look up the value for a placeholder token.
///
/// Parameter keys may be given with or without the `TMPL_` prefix.
fn resolve(
    token: &str,
    params: &BTreeMap<String, TemplateValue>,
    controls: DeployControls,
) -> Result<String, TemplateError> {
    let flag = |set: Option<bool>| set.map(|v| if v { "1" } else { "0" }.to_string());
    match token {
        UPDATABLE_TEMPLATE => {
            flag(controls.updatable).ok_or_else(|| TemplateError::UpdatableNotSet(token.to_string()))
        }
        DELETABLE_TEMPLATE => {
            flag(controls.deletable).ok_or_else(|| TemplateError::DeletableNotSet(token.to_string()))
        }
        _ => {
            let bare = token.trim_start_matches("TMPL_");
            params
                .get(token)
                .or_else(|| params.get(bare))
                .map(render)
                .ok_or_else(|| TemplateError::Unresolved(token.to_string()))
        }
    }
}

/// Replace every `TMPL_*` token outside comments and string literals, and
/// fail on any left unresolved.
///
/// # Errors
///
/// Returns the first placeholder that has no value.
pub fn substitute(
    teal: &str,
    params: &BTreeMap<String, TemplateValue>,
    controls: DeployControls,
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(teal.len());
    for (index, line) in teal.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
        }
        for segment in segments(line) {
            let code = match segment {
                Segment::Code(code) => code,
                Segment::Literal(text) | Segment::Comment(text) => {
                    out.push_str(text);
                    continue;
                }
            };
            let mut failure = None;
            let replaced = TEMPLATE_RE.replace_all(code, |caps: &Captures<'_>| {
                match resolve(&caps[0], params, controls) {
                    Ok(value) => value,
                    Err(e) => {
                        failure.get_or_insert(e);
                        caps[0].to_string()
                    }
                }
            });
            if let Some(e) = failure {
                return Err(e);
            }
            out.push_str(&replaced);
        }
    }
    Ok(out)
}
