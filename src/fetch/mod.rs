//! Loading of the survey document from disk or over HTTP.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, HeaderValue};
use tracing::debug;

/// Returns `true` when `source` should be fetched over HTTP rather than read from disk.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Downloads a survey export. Non-2xx responses are errors.
pub async fn fetch_document<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let mut req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);
    req.headers_mut()
        .insert(ACCEPT, HeaderValue::from_static("application/json"));

    let resp = client.execute(req).await?;
    debug!(status = %resp.status(), "Survey export response");
    let resp = resp.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Loads raw bytes from a local path or an http(s) URL.
#[tracing::instrument(skip(client))]
pub async fn load_bytes<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(source) {
        fetch_document(client, source)
            .await
            .with_context(|| format!("Failed to fetch {}", source))?
    } else {
        std::fs::read(source).with_context(|| format!("Failed to read {}", source))?
    };
    debug!(bytes = bytes.len(), "Survey document loaded");
    Ok(bytes)
}
