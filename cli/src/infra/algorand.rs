//! `AlgorandClient` — the production implementation of the network ports.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use deploy_common::{AppSchema, StateSchema};

use crate::application::ports::{AppLookup, TealCompiler, TransactionSender};
use crate::domain::{
    Address, AppCall, CompiledProgram, Confirmation, DeployError, DeployerAccount, ExistingApp,
    NetworkConfig,
};
use crate::infra::algod::AlgodClient;
use crate::infra::indexer::{IndexerApplication, IndexerClient};
use crate::infra::transaction::{ApplicationCallTxn, assign_group};

/// Rounds to wait for a submitted group before giving up.
pub const MAX_CONFIRMATION_ROUNDS: u64 = 5;

/// algod and indexer clients plus the accounts allowed to sign.
#[derive(Debug, Clone)]
pub struct AlgorandClient {
    algod: AlgodClient,
    indexer: IndexerClient,
    signers: BTreeMap<Address, DeployerAccount>,
}

impl AlgorandClient {
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(config: &NetworkConfig) -> Result<Self> {
        Ok(Self {
            algod: AlgodClient::new(&config.algod)?,
            indexer: IndexerClient::new(&config.indexer)?,
            signers: BTreeMap::new(),
        })
    }

    /// Register `account` as the signer for transactions sent from its address.
    #[must_use]
    pub fn with_signer(mut self, account: DeployerAccount) -> Self {
        self.signers.insert(account.address(), account);
        self
    }

    fn signer_for(&self, sender: &Address) -> Result<&DeployerAccount> {
        self.signers
            .get(sender)
            .ok_or_else(|| DeployError::NoSigner(sender.to_string()).into())
    }

    /// Turn one created application into an [`ExistingApp`] if any of its
    /// calls from `creator` carry deploy metadata.
    async fn existing_app(
        &self,
        creator: &Address,
        app: &IndexerApplication,
    ) -> Result<Option<ExistingApp>> {
        let notes = self.indexer.deploy_notes(creator, app.id).await?;
        let Some(first) = notes.first() else {
            return Ok(None);
        };
        let Some((latest, metadata)) = notes
            .iter()
            .rev()
            .find_map(|t| t.metadata().map(|m| (t, m)))
        else {
            tracing::debug!(app_id = app.id, "no readable deploy note, skipping");
            return Ok(None);
        };

        let params = &app.params;
        Ok(Some(ExistingApp {
            app_id: app.id,
            app_address: Address::for_application(app.id),
            created_round: first.confirmed_round,
            updated_round: latest.confirmed_round,
            metadata,
            deleted: app.deleted,
            approval_program: app.approval_program()?,
            clear_program: app.clear_program()?,
            schema: AppSchema {
                schema: StateSchema {
                    global_ints: params.global_state_schema.num_uint,
                    global_bytes: params.global_state_schema.num_byte_slice,
                    local_ints: params.local_state_schema.num_uint,
                    local_bytes: params.local_state_schema.num_byte_slice,
                },
                extra_pages: params.extra_program_pages,
            },
        }))
    }
}

impl TealCompiler for AlgorandClient {
    async fn compile(&self, teal: &str) -> Result<CompiledProgram> {
        self.algod.compile(teal).await
    }
}

impl AppLookup for AlgorandClient {
    async fn created_apps(&self, creator: &Address) -> Result<BTreeMap<String, ExistingApp>> {
        let apps = self.indexer.created_applications(creator).await?;
        tracing::debug!(count = apps.len(), %creator, "created applications");

        let mut by_name: BTreeMap<String, ExistingApp> = BTreeMap::new();
        for app in &apps {
            let Some(existing) = self.existing_app(creator, app).await? else {
                continue;
            };
            let newer = by_name.get(&existing.metadata.name).is_none_or(|current| {
                (existing.created_round, existing.app_id) > (current.created_round, current.app_id)
            });
            if newer {
                by_name.insert(existing.metadata.name.clone(), existing);
            }
        }
        Ok(by_name)
    }
}

impl TransactionSender for AlgorandClient {
    async fn send_group(&self, calls: &[AppCall]) -> Result<Vec<Confirmation>> {
        let params = self
            .algod
            .suggested_params()
            .await
            .context("fetching suggested params")?;

        let mut txns = Vec::with_capacity(calls.len());
        let mut signers = Vec::with_capacity(calls.len());
        for call in calls {
            let signer = self.signer_for(&call.sender)?;
            txns.push(ApplicationCallTxn::build(call, &params, signer.is_rekeyed())?);
            signers.push(signer);
        }
        assign_group(&mut txns)?;

        let mut tx_ids = Vec::with_capacity(txns.len());
        let mut blob = Vec::new();
        for (txn, signer) in txns.iter().zip(signers) {
            tx_ids.push(txn.id()?);
            blob.extend(txn.sign(signer)?);
        }

        let sent = self.algod.send_raw(blob).await?;
        tracing::debug!(tx_id = %sent, size = txns.len(), "group submitted");

        let mut confirmations = Vec::with_capacity(tx_ids.len());
        for tx_id in tx_ids {
            let pending = self
                .algod
                .wait_for_confirmation(&tx_id, MAX_CONFIRMATION_ROUNDS)
                .await?;
            confirmations.push(Confirmation {
                confirmed_round: pending.confirmed_round.unwrap_or_default(),
                app_id: pending.application_index,
                tx_id,
            });
        }
        Ok(confirmations)
    }
}
