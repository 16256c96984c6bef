//! HTTP plumbing for the fee data service.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Issues a GET for `url` and returns the body, failing on non-2xx statuses.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: Url) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Fetches `url` and decodes the body as JSON.
pub async fn fetch_json<C: HttpClient, T: DeserializeOwned>(client: &C, url: Url) -> Result<T> {
    let shown = url.to_string();
    let bytes = fetch_bytes(client, url).await?;
    debug!(url = %shown, bytes = bytes.len(), "Response received");

    serde_json::from_slice(&bytes).with_context(|| format!("Failed to parse response from {shown}"))
}
