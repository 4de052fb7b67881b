//! comfylet-core: Core types for the comfylet provisioner and proxy
//!
//! This crate provides the fundamental types used throughout comfylet:
//! - Model references and placement into the ComfyUI model tree
//! - Configuration types
//! - Error handling

pub mod config;
pub mod error;
pub mod model;

pub use config::*;
pub use error::*;
pub use model::*;
