// src/assets/http_store.rs
//! Downloads assets over plain HTTP(S).

use super::AssetStore;
use crate::constants::{
    NETWORK_RETRY_ATTEMPTS, NETWORK_RETRY_INITIAL_DELAY_MS, NETWORK_RETRY_MAX_DELAY_MS,
    PARTIAL_DOWNLOAD_SUFFIX,
};
use crate::error::AppError;
use crate::error_recovery::retry_with_backoff;
use futures::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Asset store backed by a reqwest client.
///
/// Hosted Notion files are pre-signed S3 URLs, so no auth header is sent.
#[derive(Clone)]
pub struct HttpAssetStore {
    client: Client,
}

impl HttpAssetStore {
    /// `timeout` bounds each attempt, including reading the body.
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn fetch_into(&self, url: &str, partial: &Path) -> Result<u64, AppError> {
        let response = self.client.get(url).send().await?.error_for_status()?;

        let mut file = tokio::fs::File::create(partial).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }
}

#[async_trait::async_trait]
impl AssetStore for HttpAssetStore {
    async fn download(
        &self,
        url: &str,
        destination_dir: &Path,
        target_name: &str,
    ) -> Result<PathBuf, AppError> {
        tokio::fs::create_dir_all(destination_dir).await?;

        let target = destination_dir.join(target_name);
        let partial = destination_dir.join(format!("{}{}", target_name, PARTIAL_DOWNLOAD_SUFFIX));
        let partial_ref = partial.as_path();

        let result = retry_with_backoff(
            move || self.fetch_into(url, partial_ref),
            NETWORK_RETRY_ATTEMPTS,
            Duration::from_millis(NETWORK_RETRY_INITIAL_DELAY_MS),
            Duration::from_millis(NETWORK_RETRY_MAX_DELAY_MS),
        )
        .await;

        match result {
            Ok(bytes) => {
                tokio::fs::rename(&partial, &target).await?;
                log::debug!("Downloaded {} ({} bytes) to {}", url, bytes, target.display());
                Ok(target)
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                    if cleanup.kind() != std::io::ErrorKind::NotFound {
                        log::warn!("Could not remove {}: {}", partial.display(), cleanup);
                    }
                }
                Err(e)
            }
        }
    }
}
