//! Error types for comfylet

use thiserror::Error;

/// Main error type for comfylet
#[derive(Error, Debug)]
pub enum ComfyletError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provisioning error
    #[error("Provisioning error: {0}")]
    Provision(String),

    /// Runtime error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Proxy error
    #[error("Proxy error: {0}")]
    Proxy(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for comfylet operations
pub type ComfyletResult<T> = Result<T, ComfyletError>;

impl From<serde_json::Error> for ComfyletError {
    fn from(err: serde_json::Error) -> Self {
        ComfyletError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ComfyletError {
    fn from(err: toml::de::Error) -> Self {
        ComfyletError::Config(err.to_string())
    }
}
