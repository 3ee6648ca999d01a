//! Stable Diffusion txt2img client.
//!
//! Synchronous single-image generation against a locally hosted diffusion
//! service (stable-diffusion-webui API shape). Generation parameters are
//! deployment configuration with fixed defaults.

mod client;
mod config;
mod error;

pub use client::DiffusionClient;
pub use config::{DiffusionConfig, DiffusionConfigBuilder};
pub use error::DiffusionError;
