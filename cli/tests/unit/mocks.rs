//! Shared mock infrastructure for unit tests.
//!
//! `MockNetwork` implements every network port in memory: TEAL "compiles" to
//! its own bytes, lookups return a canned map and sent groups are recorded so
//! tests can assert on exactly what would have gone on chain.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::Result;
use bank_deploy::application::ports::{AppLookup, TealCompiler, TransactionSender};
use bank_deploy::application::AppDefinition as _;
use bank_deploy::contracts::Bank;
use bank_deploy::domain::{Address, AppCall, CompiledProgram, Confirmation, ExistingApp};
use deploy_common::{AppDeployMetadata, AppSchema};

pub const FIRST_NEW_APP_ID: u64 = 1001;

pub fn deployer() -> Address {
    Address::from_public_key([0x11; 32])
}

/// Compiled bytes of the Bank programs as `MockNetwork` produces them.
pub fn bank_programs() -> (Vec<u8>, Vec<u8>) {
    let spec = Bank::app_spec().expect("Bank spec");
    (
        spec.approval_teal().expect("approval").into_bytes(),
        spec.clear_teal().expect("clear").into_bytes(),
    )
}

/// A live Bank app whose programs match the current build.
pub fn existing_bank(app_id: u64) -> ExistingApp {
    let (approval, clear) = bank_programs();
    ExistingApp {
        app_id,
        app_address: Address::for_application(app_id),
        created_round: 10,
        updated_round: 10,
        metadata: AppDeployMetadata {
            name: "Bank".to_string(),
            version: "1.0".to_string(),
            deletable: None,
            updatable: None,
        },
        deleted: false,
        approval_program: approval,
        clear_program: clear,
        schema: AppSchema::default(),
    }
}

#[derive(Default)]
pub struct MockNetwork {
    pub existing: BTreeMap<String, ExistingApp>,
    pub lookup_error: Option<String>,
    pub send_error: Option<String>,
    pub compiled: Mutex<Vec<String>>,
    pub lookups: Mutex<Vec<Address>>,
    pub sent: Mutex<Vec<Vec<AppCall>>>,
}

impl MockNetwork {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_app(app: ExistingApp) -> Self {
        let mut existing = BTreeMap::new();
        existing.insert(app.metadata.name.clone(), app);
        Self {
            existing,
            ..Self::default()
        }
    }

    pub fn sent_groups(&self) -> Vec<Vec<AppCall>> {
        self.sent.lock().unwrap().clone()
    }
}

impl TealCompiler for MockNetwork {
    async fn compile(&self, teal: &str) -> Result<CompiledProgram> {
        self.compiled.lock().unwrap().push(teal.to_string());
        Ok(CompiledProgram {
            bytes: teal.as_bytes().to_vec(),
            hash: format!("HASH{}", teal.len()),
        })
    }
}

impl AppLookup for MockNetwork {
    async fn created_apps(&self, creator: &Address) -> Result<BTreeMap<String, ExistingApp>> {
        self.lookups.lock().unwrap().push(*creator);
        if let Some(msg) = &self.lookup_error {
            anyhow::bail!("{msg}");
        }
        Ok(self.existing.clone())
    }
}

impl TransactionSender for MockNetwork {
    async fn send_group(&self, calls: &[AppCall]) -> Result<Vec<Confirmation>> {
        if let Some(msg) = &self.send_error {
            anyhow::bail!("{msg}");
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(calls.to_vec());
        let mut next_app_id = FIRST_NEW_APP_ID + (sent.len() as u64 - 1);
        Ok(calls
            .iter()
            .enumerate()
            .map(|(i, call)| {
                let app_id = (call.app_id == 0).then(|| {
                    let id = next_app_id;
                    next_app_id += 1;
                    id
                });
                Confirmation {
                    tx_id: format!("TX{}-{i}", sent.len()),
                    confirmed_round: 20,
                    app_id,
                }
            })
            .collect())
    }
}
