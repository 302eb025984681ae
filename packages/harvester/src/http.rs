//! HTTP client wrapper shared by the provider adapters.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::{http_timeout_secs, ProviderKind};
use crate::error::{ProviderError, Result};

/// User agent string identifying this harvester.
const USER_AGENT: &str = concat!("reviewbench-harvester/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` with the review timeout and user agent.
pub fn create_client() -> Result<Client> {
    create_client_with_timeout(Duration::from_secs(http_timeout_secs()))
}

/// Create a client with an explicit timeout.
pub fn create_client_with_timeout(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Send a prepared request and decode the JSON body.
///
/// Issues exactly one request. Non-success statuses become
/// `ProviderError::Api` carrying the vendor's error message when the body has
/// the usual `{"error": {"message": ...}}` shape, or the raw body otherwise.
pub fn send_json<T: DeserializeOwned>(
    provider: ProviderKind,
    request: RequestBuilder,
) -> std::result::Result<T, ProviderError> {
    let response = request
        .send()
        .map_err(|source| ProviderError::Http { provider, source })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        tracing::debug!(%provider, status = %status, body = %body, "provider returned error status");
        return Err(ProviderError::Api {
            provider,
            status: status.as_u16(),
            message: api_error_message(&body),
        });
    }

    response
        .json::<T>()
        .map_err(|source| ProviderError::Http { provider, source })
}

/// Extract a readable message from an error response body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .map(|e| e.message)
        .unwrap_or_else(|| body.to_string())
}
