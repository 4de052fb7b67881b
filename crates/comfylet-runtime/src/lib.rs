//! comfylet-runtime: ComfyUI process management
//!
//! This crate launches ComfyUI as a background OS process:
//! - `ServiceRuntime` trait for starting and stopping the service
//! - Process implementation on the comfy CLI with a fixed startup delay

pub mod process;
pub mod traits;

pub use process::ComfyRuntime;
pub use traits::ServiceRuntime;
