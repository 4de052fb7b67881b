//! Model provisioning orchestration

use comfylet_core::{
    base_model, lora_models, ComfyletResult, FailurePolicy, ModelPlacement, ProvisionConfig,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::fetch::WeightFetcher;
use crate::linker::{ensure_model_dirs, link_into_place};

/// Completion message reported after a successful run
const COMPLETION_MESSAGE: &str = "Models and LoRAs downloaded and linked.";

/// Provisioner downloads the declared model set and links it into place
///
/// The base model download is fatal on failure; LoRA downloads follow
/// the configured [`FailurePolicy`]. Runs synchronously to completion
/// before the service launcher starts.
pub struct Provisioner {
    config: ProvisionConfig,
    fetcher: Arc<dyn WeightFetcher>,
    base: ModelPlacement,
    loras: Vec<ModelPlacement>,
}

impl Provisioner {
    /// Create a provisioner for the default model set
    pub fn new(config: ProvisionConfig, fetcher: Arc<dyn WeightFetcher>) -> Self {
        Self {
            config,
            fetcher,
            base: base_model(),
            loras: lora_models(),
        }
    }

    /// Create a provisioner for an explicit model set
    pub fn with_models(
        config: ProvisionConfig,
        fetcher: Arc<dyn WeightFetcher>,
        base: ModelPlacement,
        loras: Vec<ModelPlacement>,
    ) -> Self {
        Self {
            config,
            fetcher,
            base,
            loras,
        }
    }

    /// Download every declared entry and link it into the model tree
    pub async fn provision(&self) -> ComfyletResult<String> {
        ensure_model_dirs(&self.config.models_root).await?;

        info!(
            repo = %self.base.source.repo,
            file = %self.base.source.filename,
            "Downloading base model"
        );
        self.fetch_and_link(&self.base).await?;

        for lora in &self.loras {
            match self.fetch_and_link(lora).await {
                Ok(()) => {}
                Err(e) => match self.config.failure_policy {
                    FailurePolicy::Continue => {
                        warn!(
                            file = %lora.local_name,
                            error = %e,
                            "Failed to provision LoRA, continuing"
                        );
                    }
                    FailurePolicy::Abort => return Err(e),
                },
            }
        }

        info!(loras = self.loras.len(), "Provisioning complete");
        Ok(COMPLETION_MESSAGE.to_string())
    }

    async fn fetch_and_link(&self, placement: &ModelPlacement) -> ComfyletResult<()> {
        let cached = self.fetcher.fetch(&placement.source).await?;
        link_into_place(placement, &self.config.models_root, &cached).await
    }
}
