//! Runtime trait definitions

use async_trait::async_trait;
use comfylet_core::ComfyletResult;

/// Runtime trait for managing the ComfyUI service process
#[async_trait]
pub trait ServiceRuntime: Send + Sync {
    /// Start the service process in the background
    async fn start(&mut self) -> ComfyletResult<()>;

    /// Stop the service process
    async fn stop(&mut self) -> ComfyletResult<()>;

    /// Check whether the service process is still alive
    async fn is_running(&mut self) -> ComfyletResult<bool>;

    /// Get the runtime name
    fn name(&self) -> &'static str;
}
