//! comfylet-api: HTTP surface for comfylet
//!
//! This crate provides the inbound HTTP routers:
//! - Proxy variant: root redirect, static health, prefix-forwarded traffic
//! - Direct variant: every path forwarded to ComfyUI unmodified

pub mod proxy;

pub use proxy::{create_direct_router, create_router};
