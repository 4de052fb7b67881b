//! ComfyUI process runtime
//!
//! Launches the comfy CLI as a background process. There is no
//! supervision and no readiness probe: readiness is assumed after a
//! fixed delay, and a later crash surfaces only as connection errors
//! on forwarded requests.

use async_trait::async_trait;
use comfylet_core::{ComfyletError, ComfyletResult, Endpoint, RuntimeConfig};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{debug, error, info};

use crate::traits::ServiceRuntime;

/// Process runtime for the ComfyUI service
pub struct ComfyRuntime {
    config: RuntimeConfig,
    child: Option<Child>,
}

impl ComfyRuntime {
    /// Create a new runtime
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            child: None,
        }
    }

    /// Endpoint the service listens on
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.config.listen_address.clone(), self.config.port)
    }

    /// Build the command to launch ComfyUI
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.config.comfy_path);

        cmd.arg("launch");
        cmd.arg("--");
        cmd.arg("--listen").arg(&self.config.listen_address);
        cmd.arg("--port").arg(self.config.port.to_string());
        if self.config.verbose {
            cmd.arg("--verbose");
        }

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        cmd
    }

    /// Wait the fixed startup delay before assuming the service is up
    ///
    /// There is no polling against an actual readiness signal.
    pub async fn wait_ready(&self) {
        info!(
            secs = self.config.startup_wait_secs,
            "Waiting for ComfyUI to start"
        );
        tokio::time::sleep(Duration::from_secs(self.config.startup_wait_secs)).await;
    }
}

#[async_trait]
impl ServiceRuntime for ComfyRuntime {
    async fn start(&mut self) -> ComfyletResult<()> {
        if self.child.is_some() {
            return Err(ComfyletError::Runtime(
                "service already started".to_string(),
            ));
        }

        info!(
            address = %self.config.listen_address,
            port = self.config.port,
            "Starting ComfyUI process"
        );

        match self.build_command().spawn() {
            Ok(child) => {
                debug!(pid = child.id().unwrap_or(0), "ComfyUI process spawned");
                self.child = Some(child);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to spawn ComfyUI process");
                Err(ComfyletError::Runtime(format!(
                    "Failed to spawn {}: {}",
                    self.config.comfy_path.display(),
                    e
                )))
            }
        }
    }

    async fn stop(&mut self) -> ComfyletResult<()> {
        match self.child.take() {
            Some(mut child) => {
                info!("Stopping ComfyUI process");
                child.kill().await?;
                Ok(())
            }
            None => Err(ComfyletError::Runtime("service not started".to_string())),
        }
    }

    async fn is_running(&mut self) -> ComfyletResult<bool> {
        match self.child.as_mut() {
            Some(child) => Ok(child.try_wait()?.is_none()),
            None => Ok(false),
        }
    }

    fn name(&self) -> &'static str {
        "process"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::path::PathBuf;

    #[test]
    fn test_runtime_config_default() {
        let config = RuntimeConfig::default();
        assert_eq!(config.comfy_path.to_str().unwrap(), "comfy");
        assert_eq!(config.port, 8188);
    }

    #[test]
    fn test_build_command() {
        let runtime = ComfyRuntime::new(RuntimeConfig::default());
        let cmd = runtime.build_command();

        let args: Vec<&OsStr> = cmd.as_std().get_args().collect();
        assert_eq!(
            args,
            ["launch", "--", "--listen", "127.0.0.1", "--port", "8188", "--verbose"]
        );
    }

    #[test]
    fn test_build_command_without_verbose() {
        let config = RuntimeConfig {
            verbose: false,
            ..RuntimeConfig::default()
        };
        let runtime = ComfyRuntime::new(config);
        let cmd = runtime.build_command();

        let args: Vec<&OsStr> = cmd.as_std().get_args().collect();
        assert!(!args.contains(&OsStr::new("--verbose")));
    }

    #[tokio::test]
    async fn test_start_missing_binary_fails() {
        let config = RuntimeConfig {
            comfy_path: PathBuf::from("/nonexistent/comfy"),
            ..RuntimeConfig::default()
        };
        let mut runtime = ComfyRuntime::new(config);

        let err = runtime.start().await.unwrap_err();
        assert!(matches!(err, ComfyletError::Runtime(_)));
        assert!(!runtime.is_running().await.unwrap());
    }

    #[tokio::test]
    async fn test_stop_without_start_fails() {
        let mut runtime = ComfyRuntime::new(RuntimeConfig::default());
        assert!(runtime.stop().await.is_err());
    }

    #[tokio::test]
    async fn test_double_start_fails() {
        let config = RuntimeConfig {
            comfy_path: PathBuf::from("/bin/echo"),
            startup_wait_secs: 0,
            ..RuntimeConfig::default()
        };
        let mut runtime = ComfyRuntime::new(config);

        runtime.start().await.unwrap();
        assert!(runtime.start().await.is_err());
    }

    #[test]
    fn test_endpoint() {
        let runtime = ComfyRuntime::new(RuntimeConfig::default());
        assert_eq!(runtime.endpoint().url(), "http://127.0.0.1:8188");
    }
}
