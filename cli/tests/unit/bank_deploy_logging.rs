//! Unit tests for the Bank deploy announcement.
//!
//! Tracing output is captured per test with a thread-local subscriber, so
//! these tests can count exactly how many "Deployed" lines a run emits.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use bank_deploy::application::DeployOptions;
use bank_deploy::application::services::bank_deploy::deploy_bank;
use bank_deploy::domain::Address;
use deploy_common::{OnUpdate, OperationPerformed};
use tracing::Level;

use crate::mocks::{FIRST_NEW_APP_ID, MockNetwork, deployer, existing_bank};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn deployed_lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .filter(|l| l.contains("Deployed "))
            .map(str::to_string)
            .collect()
    }
}

fn capture() -> (Captured, tracing::subscriber::DefaultGuard) {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (captured, guard)
}

#[tokio::test]
async fn create_logs_exactly_one_announcement() {
    let (logs, _guard) = capture();
    let network = MockNetwork::empty();
    let (client, result) = deploy_bank(&network, deployer(), DeployOptions::default())
        .await
        .unwrap();

    assert_eq!(result.operation_performed, OperationPerformed::Create);
    let lines = logs.deployed_lines();
    assert_eq!(lines.len(), 1, "lines: {lines:?}");
    let expected = format!(
        "Deployed Bank app {FIRST_NEW_APP_ID} to address {}",
        Address::for_application(FIRST_NEW_APP_ID)
    );
    assert!(lines[0].contains(&expected), "line: {}", lines[0]);
    assert_eq!(client.app_address, Address::for_application(FIRST_NEW_APP_ID));
}

#[tokio::test]
async fn replace_logs_the_new_app() {
    let (logs, _guard) = capture();
    let mut app = existing_bank(77);
    app.approval_program = b"older build".to_vec();
    let network = MockNetwork::with_app(app);
    let options = DeployOptions {
        on_update: OnUpdate::ReplaceApp,
        ..DeployOptions::default()
    };
    let (client, _) = deploy_bank(&network, deployer(), options).await.unwrap();

    let lines = logs.deployed_lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(&format!("Deployed Bank app {}", client.app_id)));
}

#[tokio::test]
async fn append_logs_the_new_app() {
    let (logs, _guard) = capture();
    let mut app = existing_bank(77);
    app.approval_program = b"older build".to_vec();
    let network = MockNetwork::with_app(app);
    let (client, result) = deploy_bank(&network, deployer(), DeployOptions::default())
        .await
        .unwrap();

    assert_eq!(result.operation_performed, OperationPerformed::Create);
    assert_eq!(result.previous_app_id, Some(77));
    assert_eq!(client.app_id, FIRST_NEW_APP_ID);
    let lines = logs.deployed_lines();
    assert_eq!(lines.len(), 1, "lines: {lines:?}");
    let expected = format!(
        "Deployed Bank app {FIRST_NEW_APP_ID} to address {}",
        Address::for_application(FIRST_NEW_APP_ID)
    );
    assert!(lines[0].contains(&expected), "line: {}", lines[0]);
}

#[tokio::test]
async fn noop_logs_nothing() {
    let (logs, _guard) = capture();
    let network = MockNetwork::with_app(existing_bank(77));
    let (_, result) = deploy_bank(&network, deployer(), DeployOptions::default())
        .await
        .unwrap();

    assert_eq!(result.operation_performed, OperationPerformed::NoOp);
    assert!(logs.deployed_lines().is_empty());
}

#[tokio::test]
async fn update_logs_nothing() {
    let (logs, _guard) = capture();
    let mut app = existing_bank(77);
    app.approval_program = b"older build".to_vec();
    let network = MockNetwork::with_app(app);
    let options = DeployOptions {
        on_update: OnUpdate::UpdateApp,
        ..DeployOptions::default()
    };
    let (_, result) = deploy_bank(&network, deployer(), options).await.unwrap();

    assert_eq!(result.operation_performed, OperationPerformed::Update);
    assert!(logs.deployed_lines().is_empty());
}

#[tokio::test]
async fn failed_deploy_logs_nothing() {
    let (logs, _guard) = capture();
    let network = MockNetwork {
        send_error: Some("rejected".to_string()),
        ..MockNetwork::default()
    };
    let err = deploy_bank(&network, deployer(), DeployOptions::default())
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("rejected"));
    assert!(logs.deployed_lines().is_empty());
}
