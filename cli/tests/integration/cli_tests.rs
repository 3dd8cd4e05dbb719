//! Integration tests for CLI structure and argument parsing.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn bank_deploy() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bank-deploy"));
    cmd.env("NO_COLOR", "1");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    bank_deploy().assert().code(2).stderr(predicate::str::contains(
        "Deploy the Bank application to an Algorand network",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    bank_deploy()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("version"));
}

#[test]
fn test_version_command_shows_version() {
    bank_deploy()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bank-deploy 0.1.0"));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = bank_deploy()
        .args(["version", "--json"])
        .output()
        .expect("run bank-deploy");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("version --json prints JSON");
    assert_eq!(value["version"], "0.1.0");
    assert_eq!(value["name"], "bank-deploy");
}

#[test]
fn test_deploy_help_lists_policies() {
    bank_deploy()
        .args(["deploy", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--on-update"))
        .stdout(predicate::str::contains("--on-schema-break"))
        .stdout(predicate::str::contains("append-app"));
}

// --- Error handling tests ---

#[test]
fn test_unknown_command_exits_with_error() {
    bank_deploy().arg("nonexistent").assert().failure().code(2);
}

#[test]
fn test_invalid_policy_is_usage_error() {
    bank_deploy()
        .args(["deploy", "--on-update", "sometimes"])
        .assert()
        .code(2);
}

#[test]
fn test_deploy_without_deployer_fails_with_hint() {
    bank_deploy()
        .arg("deploy")
        .env_remove("DEPLOYER_MNEMONIC")
        .env_remove("ALGOD_SERVER")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("DEPLOYER_MNEMONIC"));
}

#[test]
fn test_algod_without_indexer_fails() {
    let mnemonic = bank_deploy::domain::DeployerAccount::from_seed([5u8; 32]).to_mnemonic();
    bank_deploy()
        .arg("deploy")
        .env("DEPLOYER_MNEMONIC", mnemonic)
        .env("ALGOD_SERVER", "http://127.0.0.1")
        .env_remove("INDEXER_SERVER")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("INDEXER_SERVER"));
}
