//! Shared HTTP plumbing for the algod and indexer clients.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::domain::NetworkError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the reqwest client used for every Algorand request.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("bank-deploy/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")
}

/// Pass successful responses through; turn anything else into [`NetworkError::Status`].
///
/// # Errors
///
/// Returns an error carrying the status code and response body on non-2xx.
pub async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(NetworkError::Status {
        service,
        status: status.as_u16(),
        body: body.trim().to_string(),
    }
    .into())
}
