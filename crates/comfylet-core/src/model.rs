//! Model reference and placement type definitions

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A single downloadable weight file on the artifact hub
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRef {
    /// Hub repository identifier (e.g., "runcomfy/flux1-kontext-dev")
    pub repo: String,
    /// File name within the repository
    pub filename: String,
}

impl ModelRef {
    /// Create a new model reference
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            repo: repo.to_string(),
            filename: filename.to_string(),
        }
    }
}

impl std::fmt::Display for ModelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.repo, self.filename)
    }
}

/// Kind of weight file, selecting the ComfyUI target directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Base diffusion model
    Diffusion,
    /// Auxiliary LoRA weights applied on top of the base model
    Lora,
}

impl ModelKind {
    /// Directory name under the ComfyUI models root
    pub fn dir_name(&self) -> &'static str {
        match self {
            ModelKind::Diffusion => "diffusion_models",
            ModelKind::Lora => "loras",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKind::Diffusion => write!(f, "diffusion"),
            ModelKind::Lora => write!(f, "lora"),
        }
    }
}

/// Mapping from a canonical local file name to its hub source
///
/// After provisioning, `models_root/<dir>/<local_name>` is a symlink
/// resolving to the cached download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPlacement {
    /// File name ComfyUI expects under the kind's directory
    pub local_name: String,
    /// Target directory selector
    pub kind: ModelKind,
    /// Where the file comes from
    pub source: ModelRef,
}

impl ModelPlacement {
    /// Create a new placement
    pub fn new(local_name: &str, kind: ModelKind, source: ModelRef) -> Self {
        Self {
            local_name: local_name.to_string(),
            kind,
            source,
        }
    }

    /// Symlink path for this placement under the given models root
    pub fn target_path(&self, models_root: &Path) -> PathBuf {
        models_root.join(self.kind.dir_name()).join(&self.local_name)
    }
}

/// Network endpoint for the local ComfyUI service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
}

impl Endpoint {
    /// Create a new endpoint
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// Get the URL for this endpoint
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// The base diffusion model ComfyUI serves
pub fn base_model() -> ModelPlacement {
    ModelPlacement::new(
        "flux1-kontext-dev.safetensors",
        ModelKind::Diffusion,
        ModelRef::new("runcomfy/flux1-kontext-dev", "flux1-kontext-dev.safetensors"),
    )
}

/// The fixed set of LoRA weight files linked alongside the base model
pub fn lora_models() -> Vec<ModelPlacement> {
    vec![
        ModelPlacement::new(
            "time_tale.safetensors",
            ModelKind::Lora,
            ModelRef::new("some-user/time-tale-lora", "time_tale.safetensors"),
        ),
        ModelPlacement::new(
            "ultrarealistic_v2.safetensors",
            ModelKind::Lora,
            ModelRef::new("runcomfy/ultrarealistic-lora-v2", "ultrarealistic_v2.safetensors"),
        ),
        ModelPlacement::new(
            "awportrait_cn_1_0.safetensors",
            ModelKind::Lora,
            ModelRef::new("some-user/awportrait-cn", "awportrait_cn_1_0.safetensors"),
        ),
        ModelPlacement::new(
            "detail_enhancer_f1.safetensors",
            ModelKind::Lora,
            ModelRef::new("some-user/detail-enhancer-f1", "detail_enhancer_f1.safetensors"),
        ),
        ModelPlacement::new(
            "instagirl_wan_v2_3.safetensors",
            ModelKind::Lora,
            ModelRef::new("some-user/instagirl-wan-lora", "instagirl_wan_v2_3.safetensors"),
        ),
        ModelPlacement::new(
            "pulid_2.safetensors",
            ModelKind::Lora,
            ModelRef::new("some-user/pulid-2-lora", "pulid_2.safetensors"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_ref_display() {
        let source = ModelRef::new("runcomfy/flux1-kontext-dev", "flux1-kontext-dev.safetensors");
        assert_eq!(
            source.to_string(),
            "runcomfy/flux1-kontext-dev/flux1-kontext-dev.safetensors"
        );
    }

    #[test]
    fn test_target_path() {
        let placement = base_model();
        let path = placement.target_path(Path::new("/root/comfy/ComfyUI/models"));
        assert_eq!(
            path.to_str().unwrap(),
            "/root/comfy/ComfyUI/models/diffusion_models/flux1-kontext-dev.safetensors"
        );
    }

    #[test]
    fn test_lora_target_dir() {
        let loras = lora_models();
        assert_eq!(loras.len(), 6);
        for lora in &loras {
            let path = lora.target_path(Path::new("/models"));
            assert!(path.starts_with("/models/loras"));
        }
    }

    #[test]
    fn test_endpoint_url() {
        let endpoint = Endpoint::new("127.0.0.1".to_string(), 8188);
        assert_eq!(endpoint.url(), "http://127.0.0.1:8188");
    }
}
