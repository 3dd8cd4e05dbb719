//! Version command

use anyhow::{Context, Result};

/// Run the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(json: bool) -> Result<()> {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    if json {
        let out = serde_json::json!({ "name": name, "version": version });
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("JSON serialization failed")?
        );
    } else {
        println!("{name} {version}");
    }
    Ok(())
}
