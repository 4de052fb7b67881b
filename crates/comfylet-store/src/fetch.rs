//! Weight fetching from the artifact hub

use async_trait::async_trait;
use comfylet_core::{ComfyletError, ComfyletResult, ModelRef};
use hf_hub::api::tokio::{Api, ApiBuilder};
use std::path::PathBuf;
use tracing::debug;

/// Fetcher trait for downloading weight files into the cache
#[async_trait]
pub trait WeightFetcher: Send + Sync {
    /// Fetch one weight file, returning the path of the cached copy
    async fn fetch(&self, source: &ModelRef) -> ComfyletResult<PathBuf>;
}

/// Hugging Face Hub fetcher backed by the shared cache volume
///
/// The hub client keeps its own cache layout under the cache directory,
/// so repeated fetches of the same file do not re-download.
pub struct HubFetcher {
    api: Api,
}

impl HubFetcher {
    /// Create a new hub fetcher caching into the given directory
    pub fn new(cache_dir: PathBuf) -> ComfyletResult<Self> {
        let api = ApiBuilder::new()
            .with_cache_dir(cache_dir)
            .build()
            .map_err(|e| {
                ComfyletError::Provision(format!("Failed to build hub client: {}", e))
            })?;

        Ok(Self { api })
    }
}

#[async_trait]
impl WeightFetcher for HubFetcher {
    async fn fetch(&self, source: &ModelRef) -> ComfyletResult<PathBuf> {
        debug!(
            repo = %source.repo,
            file = %source.filename,
            "Fetching weight file"
        );

        self.api
            .model(source.repo.clone())
            .get(&source.filename)
            .await
            .map_err(|e| {
                ComfyletError::Provision(format!(
                    "Failed to download {} from {}: {}",
                    source.filename, source.repo, e
                ))
            })
    }
}
