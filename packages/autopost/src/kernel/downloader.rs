use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use super::BaseImageDownloader;

/// Plain HTTP GET downloader for generated images
pub struct HttpImageDownloader {
    client: reqwest::Client,
}

impl HttpImageDownloader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl BaseImageDownloader for HttpImageDownloader {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?
            .error_for_status()
            .context("Image host returned an error")?;

        let bytes = response
            .bytes()
            .await
            .context("Failed to read image body")?;

        tracing::debug!(url, size = bytes.len(), "Downloaded image");
        Ok(bytes.to_vec())
    }
}
