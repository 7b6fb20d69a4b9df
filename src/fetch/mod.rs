//! Loading workbook bytes from disk or over HTTP.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::debug;

/// Downloads `url`, failing on non-success status codes.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    let bytes = resp.bytes().await?.to_vec();
    debug!(url, bytes = bytes.len(), "Workbook downloaded");
    Ok(bytes)
}

/// Reads a workbook from a local path, or fetches it when `source` is an `http(s)` URL.
#[tracing::instrument(skip(source), fields(source = %source))]
pub async fn load_workbook(source: &str) -> Result<Vec<u8>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let client = BasicClient::new();
        fetch_bytes(&client, source)
            .await
            .with_context(|| format!("failed to download '{source}'"))
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read '{source}'"))
    }
}
