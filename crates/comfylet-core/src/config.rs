//! Configuration types for comfylet

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for a container run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// ComfyUI process configuration
    pub runtime: RuntimeConfig,
    /// Model provisioning configuration
    pub provision: ProvisionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            runtime: RuntimeConfig::default(),
            provision: ProvisionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::ComfyletError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::ComfyletError::Config(format!("Failed to read config file: {}", e))
        })?;
        toml::from_str(&content)
            .map_err(|e| crate::ComfyletError::Config(format!("Failed to parse config: {}", e)))
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP server
    pub address: String,
    /// Port for the HTTP server
    pub port: u16,
    /// Path prefix under which ComfyUI traffic is forwarded
    pub proxy_prefix: String,
    /// Expose ComfyUI directly instead of behind the prefix
    pub direct: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 8000,
            proxy_prefix: "/comfyui".to_string(),
            direct: false,
        }
    }
}

/// ComfyUI process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Path to the comfy CLI binary
    pub comfy_path: PathBuf,
    /// Address ComfyUI listens on
    pub listen_address: String,
    /// Port ComfyUI listens on
    pub port: u16,
    /// Pass --verbose to ComfyUI
    pub verbose: bool,
    /// Fixed delay before the service is assumed ready
    pub startup_wait_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            comfy_path: PathBuf::from("comfy"),
            listen_address: "127.0.0.1".to_string(),
            port: 8188,
            verbose: true,
            startup_wait_secs: 15,
        }
    }
}

/// Model provisioning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Cache directory shared across provisioning runs
    pub cache_dir: PathBuf,
    /// ComfyUI models root the weight files are linked into
    pub models_root: PathBuf,
    /// What to do when an auxiliary download fails
    pub failure_policy: FailurePolicy,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("/cache"),
            models_root: PathBuf::from("/root/comfy/ComfyUI/models"),
            failure_policy: FailurePolicy::Continue,
        }
    }
}

/// Failure handling for auxiliary model downloads
///
/// The base model download is always fatal; this policy only governs
/// the LoRA entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and continue with the remaining entries
    Continue,
    /// Propagate the first failure and abort the run
    Abort,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::Continue => write!(f, "continue"),
            FailurePolicy::Abort => write!(f, "abort"),
        }
    }
}
