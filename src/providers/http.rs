//! Shared HTTP plumbing for provider clients

use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, warn};

use super::UpstreamError;
use crate::config::HttpConfig;

/// Build the outbound client with the per-call timeout and user agent
pub fn build_client(config: &HttpConfig) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.as_str())
        .build()
        .with_context(|| "Failed to create HTTP client")?;

    Ok(ClientBuilder::new(client).build())
}

/// Send a request and decode a JSON body, classifying failures for retry
pub async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    provider: &str,
) -> Result<T, UpstreamError> {
    let start = Instant::now();
    let response = request.send().await.map_err(|e| {
        warn!("{} request failed: {}", provider, e);
        UpstreamError::from(e)
    })?;

    let status = response.status();
    debug!(
        "{} responded {} in {:.3}s",
        provider,
        status,
        start.elapsed().as_secs_f64()
    );

    if status == StatusCode::NOT_FOUND {
        return Err(UpstreamError::NotFound(format!("{provider} returned 404")));
    }

    if let Some(retryable) = reqwest_retry::default_on_request_success(&response) {
        let message = format!(
            "{provider} responded with {} - {}",
            status,
            status.canonical_reason().unwrap_or("Unknown error")
        );
        warn!("{}", message);
        return Err(UpstreamError::classified(Some(retryable), message));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| UpstreamError::InvalidResponse(format!("{provider}: {e}")))
}
