//! algod REST client — compile, transaction params, submit and confirm.

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::domain::config::ServiceConfig;
use crate::domain::{CompiledProgram, NetworkError, SuggestedParams};
use crate::infra::http::{check_status, http_client};

const TOKEN_HEADER: &str = "X-Algo-API-Token";
/// Rounds a transaction stays valid after the current round.
const VALIDITY_WINDOW: u64 = 1000;

#[derive(Debug, Deserialize)]
struct CompileResponse {
    hash: String,
    result: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct TransactionParamsResponse {
    fee: u64,
    min_fee: u64,
    last_round: u64,
    genesis_id: String,
    genesis_hash: String,
}

#[derive(Debug, Deserialize)]
struct PostTransactionsResponse {
    #[serde(rename = "txId")]
    tx_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct NodeStatusResponse {
    last_round: u64,
}

/// A transaction as seen in the node's pending pool.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PendingTransaction {
    #[serde(default)]
    pub confirmed_round: Option<u64>,
    #[serde(default)]
    pub pool_error: String,
    #[serde(default)]
    pub application_index: Option<u64>,
}

/// Client for one algod endpoint.
#[derive(Debug, Clone)]
pub struct AlgodClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl AlgodClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            base_url: config.base_url(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(self.url(path))
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await
            .with_context(|| format!("GET {path}"))?;
        let response = check_status("algod", response).await?;
        response
            .json()
            .await
            .with_context(|| format!("decoding algod response for {path}"))
    }

    /// Compile TEAL source.
    ///
    /// # Errors
    ///
    /// Returns an error if algod rejects the source or is unreachable.
    pub async fn compile(&self, teal: &str) -> Result<CompiledProgram> {
        let response = self
            .http
            .post(self.url("/v2/teal/compile"))
            .header(TOKEN_HEADER, &self.token)
            .header(CONTENT_TYPE, "text/plain")
            .body(teal.to_string())
            .send()
            .await
            .context("POST /v2/teal/compile")?;
        let response = check_status("algod", response).await?;
        let compiled: CompileResponse = response
            .json()
            .await
            .context("decoding compile response")?;
        let bytes = STANDARD
            .decode(&compiled.result)
            .context("compile result is not base64")?;
        Ok(CompiledProgram {
            bytes,
            hash: compiled.hash,
        })
    }

    /// Fee and validity parameters for new transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if algod is unreachable or returns a malformed genesis hash.
    pub async fn suggested_params(&self) -> Result<SuggestedParams> {
        let params: TransactionParamsResponse = self.get_json("/v2/transactions/params").await?;
        let hash = STANDARD
            .decode(&params.genesis_hash)
            .context("genesis hash is not base64")?;
        let genesis_hash: [u8; 32] = hash
            .try_into()
            .map_err(|_| anyhow::anyhow!("genesis hash is not 32 bytes"))?;
        Ok(SuggestedParams {
            fee_per_byte: params.fee,
            min_fee: params.min_fee,
            first_valid: params.last_round,
            last_valid: params.last_round + VALIDITY_WINDOW,
            genesis_id: params.genesis_id,
            genesis_hash,
        })
    }

    /// Submit one or more concatenated signed transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the node rejects the submission.
    pub async fn send_raw(&self, signed: Vec<u8>) -> Result<String> {
        let response = self
            .http
            .post(self.url("/v2/transactions"))
            .header(TOKEN_HEADER, &self.token)
            .header(CONTENT_TYPE, "application/x-binary")
            .body(signed)
            .send()
            .await
            .context("POST /v2/transactions")?;
        let response = check_status("algod", response).await?;
        let posted: PostTransactionsResponse = response
            .json()
            .await
            .context("decoding submit response")?;
        Ok(posted.tx_id)
    }

    /// # Errors
    ///
    /// Returns an error if algod is unreachable.
    pub async fn pending_transaction(&self, tx_id: &str) -> Result<PendingTransaction> {
        self.get_json(&format!("/v2/transactions/pending/{tx_id}"))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if algod is unreachable.
    pub async fn last_round(&self) -> Result<u64> {
        let status: NodeStatusResponse = self.get_json("/v2/status").await?;
        Ok(status.last_round)
    }

    /// Block until the node has seen a round after `round`.
    ///
    /// # Errors
    ///
    /// Returns an error if algod is unreachable.
    pub async fn wait_for_block_after(&self, round: u64) -> Result<u64> {
        let status: NodeStatusResponse = self
            .get_json(&format!("/v2/status/wait-for-block-after/{round}"))
            .await?;
        Ok(status.last_round)
    }

    /// Poll until `tx_id` is confirmed, rejected, or `max_rounds` pass.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Rejected`] when the pool drops the transaction
    /// and [`NetworkError::NotConfirmed`] when it does not land in time.
    pub async fn wait_for_confirmation(
        &self,
        tx_id: &str,
        max_rounds: u64,
    ) -> Result<PendingTransaction> {
        let start = self.last_round().await?;
        let mut round = start;
        loop {
            let pending = self.pending_transaction(tx_id).await?;
            if pending.confirmed_round.is_some_and(|r| r > 0) {
                return Ok(pending);
            }
            if !pending.pool_error.is_empty() {
                return Err(NetworkError::Rejected {
                    tx_id: tx_id.to_string(),
                    reason: pending.pool_error,
                }
                .into());
            }
            if round >= start + max_rounds {
                return Err(NetworkError::NotConfirmed {
                    tx_id: tx_id.to_string(),
                    rounds: max_rounds,
                }
                .into());
            }
            self.wait_for_block_after(round).await?;
            round += 1;
        }
    }
}
