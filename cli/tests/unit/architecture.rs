//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries
//! (domain → application → infra → commands) are maintained.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Read a file and strip comment lines to avoid false positives.
fn read_non_comment_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .filter(|l| {
            let trimmed = l.trim();
            !trimmed.starts_with("//") && !trimmed.starts_with("/*") && !trimmed.starts_with('*')
        })
        .map(String::from)
        .collect()
}

/// Report every line under `src/<layer>` containing one of `forbidden`.
fn violations(layer: &str, forbidden: &[&str]) -> Vec<String> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut found = Vec::new();
    for file in collect_rs_files(&root.join("src").join(layer)) {
        let rel = file.strip_prefix(root).unwrap_or(&file).display().to_string();
        for (i, line) in read_non_comment_lines(&file).iter().enumerate() {
            for needle in forbidden {
                if line.contains(needle) {
                    found.push(format!("{rel}:{}: `{needle}` in: {line}", i + 1));
                }
            }
        }
    }
    found
}

#[test]
fn domain_is_pure() {
    let found = violations(
        "domain",
        &[
            "crate::infra",
            "crate::application",
            "crate::commands",
            "tokio",
            "reqwest",
            "std::env",
        ],
    );
    assert!(found.is_empty(), "domain/ must stay free of I/O:\n{}", found.join("\n"));
}

#[test]
fn application_does_not_reach_into_infra() {
    let found = violations(
        "application",
        &["crate::infra", "crate::commands", "crate::output", "reqwest"],
    );
    assert!(
        found.is_empty(),
        "application/ must route I/O through ports:\n{}",
        found.join("\n")
    );
}

#[test]
fn infra_does_not_depend_on_commands() {
    let found = violations("infra", &["crate::commands", "crate::output"]);
    assert!(found.is_empty(), "infra/ must not depend on commands:\n{}", found.join("\n"));
}

#[test]
fn commands_use_ports_not_clients() {
    let found = violations("commands", &["AlgodClient", "IndexerClient", "reqwest"]);
    assert!(
        found.is_empty(),
        "commands/ must take the network as a port:\n{}",
        found.join("\n")
    );
}
