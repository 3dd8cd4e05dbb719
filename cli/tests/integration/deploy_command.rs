//! End-to-end `bank-deploy deploy` runs against a wiremock algod + indexer.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::process::Output;

use assert_cmd::Command;
use bank_deploy::domain::{Address, DeployerAccount};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use deploy_common::AppDeployMetadata;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROGRAM: [u8; 4] = [0x0a, 0x81, 0x01, 0x43];
const NEW_APP_ID: u64 = 1234;

fn account() -> DeployerAccount {
    DeployerAccount::from_seed([21u8; 32])
}

fn json(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

async fn mount_algod(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v2/teal/compile"))
        .respond_with(json(serde_json::json!({
            "hash": "PROGRAMHASH",
            "result": STANDARD.encode(PROGRAM),
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/transactions/params"))
        .respond_with(json(serde_json::json!({
            "consensus-version": "future",
            "fee": 0,
            "min-fee": 1000,
            "last-round": 100,
            "genesis-id": "dockernet-v1",
            "genesis-hash": STANDARD.encode([1u8; 32]),
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/status"))
        .respond_with(json(serde_json::json!({"last-round": 100})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/v2/transactions/pending/[A-Z2-7]+$"))
        .respond_with(json(serde_json::json!({
            "confirmed-round": 101,
            "pool-error": "",
            "application-index": NEW_APP_ID,
        })))
        .mount(server)
        .await;
}

async fn mount_created_apps(server: &MockServer, apps: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/v2/accounts/{}/created-applications",
            account().address()
        )))
        .respond_with(json(serde_json::json!({ "applications": apps })))
        .mount(server)
        .await;
}

/// Run `bank-deploy deploy` with both services pointed at `server`.
async fn run_deploy(server: &MockServer, mnemonic: Option<String>, extra: &[&str]) -> Output {
    let uri = server.uri();
    let args: Vec<String> = extra.iter().map(|s| (*s).to_string()).collect();
    tokio::task::spawn_blocking(move || {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bank-deploy"));
        cmd.env("NO_COLOR", "1")
            .env("RUST_LOG", "info")
            .env("ALGOD_SERVER", &uri)
            .env("INDEXER_SERVER", &uri)
            .env_remove("ALGOD_PORT")
            .env_remove("INDEXER_PORT")
            .env_remove("DEPLOYER_SENDER")
            .arg("deploy")
            .args(args);
        match mnemonic {
            Some(m) => cmd.env("DEPLOYER_MNEMONIC", m),
            None => cmd.env_remove("DEPLOYER_MNEMONIC"),
        };
        cmd.output().expect("run bank-deploy")
    })
    .await
    .unwrap()
}

fn announcements(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stderr)
        .lines()
        .filter(|l| l.contains("Deployed Bank app"))
        .map(str::to_string)
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn first_deploy_creates_and_announces_once() {
    let server = MockServer::start().await;
    mount_algod(&server).await;
    mount_created_apps(&server, serde_json::json!([])).await;
    Mock::given(method("POST"))
        .and(path("/v2/transactions"))
        .respond_with(json(serde_json::json!({"txId": "SUBMITTED"})))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_deploy(&server, Some(account().to_mnemonic()), &[]).await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let lines = announcements(&output);
    assert_eq!(lines.len(), 1, "announcements: {lines:?}");
    let expected = format!(
        "Deployed Bank app {NEW_APP_ID} to address {}",
        Address::for_application(NEW_APP_ID)
    );
    assert!(lines[0].contains(&expected), "line: {}", lines[0]);
}

#[tokio::test(flavor = "multi_thread")]
async fn unchanged_app_sends_nothing_and_stays_quiet() {
    let server = MockServer::start().await;
    mount_algod(&server).await;
    mount_created_apps(
        &server,
        serde_json::json!([{
            "id": 77,
            "deleted": false,
            "created-at-round": 50,
            "params": {
                "approval-program": STANDARD.encode(PROGRAM),
                "clear-state-program": STANDARD.encode(PROGRAM),
                "global-state-schema": {"num-uint": 0, "num-byte-slice": 0},
                "local-state-schema": {"num-uint": 0, "num-byte-slice": 0},
            },
        }]),
    )
    .await;
    let note = AppDeployMetadata {
        name: "Bank".to_string(),
        version: "1.0".to_string(),
        deletable: None,
        updatable: None,
    }
    .to_note();
    Mock::given(method("GET"))
        .and(path("/v2/transactions"))
        .respond_with(json(serde_json::json!({
            "transactions": [{"id": "CREATE77", "confirmed-round": 50, "note": STANDARD.encode(note)}],
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/transactions"))
        .respond_with(json(serde_json::json!({"txId": "UNEXPECTED"})))
        .expect(0)
        .mount(&server)
        .await;

    let output = run_deploy(&server, Some(account().to_mnemonic()), &["--json"]).await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(announcements(&output).is_empty());
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["operation_performed"], "no_op");
    assert_eq!(result["app"]["app_id"], 77);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_deployer_makes_no_network_calls() {
    let server = MockServer::start().await;

    let output = run_deploy(&server, None, &[]).await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("DEPLOYER_MNEMONIC"), "stderr: {stderr}");
    assert!(announcements(&output).is_empty());
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty(), "unexpected requests: {}", received.len());
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_group_exits_non_zero_without_announcement() {
    let server = MockServer::start().await;
    mount_algod(&server).await;
    mount_created_apps(&server, serde_json::json!([])).await;
    Mock::given(method("POST"))
        .and(path("/v2/transactions"))
        .respond_with(ResponseTemplate::new(400).set_body_string("overspend"))
        .mount(&server)
        .await;

    let output = run_deploy(&server, Some(account().to_mnemonic()), &[]).await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("overspend"), "stderr: {stderr}");
    assert!(announcements(&output).is_empty());
}
