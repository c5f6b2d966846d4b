//! HTTP fetch collaborator
//!
//! The engine treats a fetch as a single opaque operation: it either yields
//! the response body as bytes or fails. Transport errors (connection, DNS,
//! timeout) and body-read errors are failures; a response with any HTTP
//! status is a success, and its body is the page content.

use crate::config::CrawlerConfig;
use reqwest::Client;
use std::time::Duration;

/// Builds the shared HTTP client for one engine instance
///
/// # Arguments
///
/// * `config` - Crawler configuration supplying the user-agent string and
///   request/connect timeouts
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches an address and returns the raw response body
///
/// Any HTTP response that yields a body counts as a success; the status code
/// is surfaced only as a debug event. A non-resolvable address, transport
/// failure, timeout, or body-read failure is an error, which the engine
/// answers by abandoning the branch.
pub async fn fetch_url(client: &Client, address: &str) -> Result<Vec<u8>, reqwest::Error> {
    let response = client.get(address).send().await?;
    let status = response.status();
    let body = response.bytes().await?;

    tracing::trace!(%address, status = status.as_u16(), bytes = body.len(), "fetched");

    Ok(body.to_vec())
}
