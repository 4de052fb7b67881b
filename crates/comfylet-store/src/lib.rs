//! comfylet-store: Model provisioning
//!
//! This crate downloads the base diffusion model and the LoRA set into
//! the shared cache volume and links them into the ComfyUI model tree:
//! - Hub fetching behind the `WeightFetcher` seam
//! - Symlink placement (create-or-replace, last-writer-wins)
//! - Run-to-completion provisioning with a failure policy

pub mod fetch;
pub mod linker;
pub mod provision;

pub use fetch::{HubFetcher, WeightFetcher};
pub use provision::Provisioner;
