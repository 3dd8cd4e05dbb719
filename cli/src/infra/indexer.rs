//! Indexer REST client — created applications and their deploy notes.

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use deploy_common::AppDeployMetadata;
use serde::Deserialize;

use crate::domain::Address;
use crate::domain::config::ServiceConfig;
use crate::infra::http::{check_status, http_client};

const TOKEN_HEADER: &str = "X-Indexer-API-Token";

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IndexerSchema {
    #[serde(default)]
    pub num_uint: u64,
    #[serde(default)]
    pub num_byte_slice: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IndexerAppParams {
    #[serde(default)]
    pub approval_program: String,
    #[serde(default)]
    pub clear_state_program: String,
    #[serde(default)]
    pub global_state_schema: IndexerSchema,
    #[serde(default)]
    pub local_state_schema: IndexerSchema,
    #[serde(default)]
    pub extra_program_pages: u64,
}

/// An application as reported by `created-applications`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IndexerApplication {
    pub id: u64,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub params: IndexerAppParams,
}

impl IndexerApplication {
    /// # Errors
    ///
    /// Returns an error if the program field is not base64.
    pub fn approval_program(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.params.approval_program)
            .with_context(|| format!("app {} approval program is not base64", self.id))
    }

    /// # Errors
    ///
    /// Returns an error if the program field is not base64.
    pub fn clear_program(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.params.clear_state_program)
            .with_context(|| format!("app {} clear program is not base64", self.id))
    }
}

/// A transaction carrying a deploy note.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IndexerTransaction {
    pub id: String,
    #[serde(default)]
    pub confirmed_round: u64,
    #[serde(default)]
    pub note: Option<String>,
}

impl IndexerTransaction {
    /// Deploy metadata in this transaction's note, if it carries a readable one.
    #[must_use]
    pub fn metadata(&self) -> Option<AppDeployMetadata> {
        let raw = STANDARD.decode(self.note.as_deref()?).ok()?;
        AppDeployMetadata::from_note(&raw).ok()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ApplicationsPage {
    #[serde(default)]
    applications: Vec<IndexerApplication>,
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct TransactionsPage {
    #[serde(default)]
    transactions: Vec<IndexerTransaction>,
    #[serde(default)]
    next_token: Option<String>,
}

/// Client for one indexer endpoint.
#[derive(Debug, Clone)]
pub struct IndexerClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl IndexerClient {
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

    async fn get_page<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .header(TOKEN_HEADER, &self.token)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {path}"))?;
        let response = check_status("indexer", response).await?;
        response
            .json()
            .await
            .with_context(|| format!("decoding indexer response for {path}"))
    }

    /// Every application `creator` has created, deleted ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the indexer is unreachable or answers with an error.
    pub async fn created_applications(&self, creator: &Address) -> Result<Vec<IndexerApplication>> {
        let path = format!("/v2/accounts/{creator}/created-applications");
        let mut apps = Vec::new();
        let mut next: Option<String> = None;
        loop {
            let mut query = vec![("include-all", "true".to_string())];
            if let Some(token) = next.take() {
                query.push(("next", token));
            }
            let page: ApplicationsPage = self.get_page(&path, &query).await?;
            let done = page.applications.is_empty();
            apps.extend(page.applications);
            match page.next_token {
                Some(token) if !done => next = Some(token),
                _ => break,
            }
        }
        Ok(apps)
    }

    /// Application calls from `creator` to `app_id` whose note starts with
    /// the deploy metadata prefix, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the indexer is unreachable or answers with an error.
    pub async fn deploy_notes(
        &self,
        creator: &Address,
        app_id: u64,
    ) -> Result<Vec<IndexerTransaction>> {
        let prefix = STANDARD.encode(AppDeployMetadata::note_prefix());
        let mut txns = Vec::new();
        let mut next: Option<String> = None;
        loop {
            let mut query = vec![
                ("address", creator.to_string()),
                ("address-role", "sender".to_string()),
                ("application-id", app_id.to_string()),
                ("note-prefix", prefix.clone()),
                ("tx-type", "appl".to_string()),
            ];
            if let Some(token) = next.take() {
                query.push(("next", token));
            }
            let page: TransactionsPage = self.get_page("/v2/transactions", &query).await?;
            let done = page.transactions.is_empty();
            txns.extend(page.transactions);
            match page.next_token {
                Some(token) if !done => next = Some(token),
                _ => break,
            }
        }
        txns.sort_by_key(|t| t.confirmed_round);
        Ok(txns)
    }
}
