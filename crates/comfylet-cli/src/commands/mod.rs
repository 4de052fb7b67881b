//! CLI commands implementation

use anyhow::Result;
use comfylet_core::{FailurePolicy, ProvisionConfig};
use comfylet_store::{HubFetcher, Provisioner};
use std::path::PathBuf;
use std::sync::Arc;

/// API client for communicating with the daemon
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Run provisioning and print the completion message
pub async fn provision(
    cache_dir: PathBuf,
    models_root: PathBuf,
    abort_on_error: bool,
) -> Result<()> {
    let config = ProvisionConfig {
        cache_dir,
        models_root,
        failure_policy: if abort_on_error {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Continue
        },
    };

    let fetcher = Arc::new(HubFetcher::new(config.cache_dir.clone())?);
    let provisioner = Provisioner::new(config, fetcher);
    let message = provisioner.provision().await?;

    println!("{}", message);
    Ok(())
}

/// Query the daemon's health endpoint and print the response
pub async fn health(client: &ApiClient) -> Result<()> {
    let response = client.client.get(client.url("/health")).send().await?;
    let body: serde_json::Value = response.json().await?;

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
