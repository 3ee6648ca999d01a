//! Character-based text-generation backend.
//!
//! Talks to a locally hosted text-generation-webui style endpoint that
//! accepts a `character` parameter alongside an OpenAI-shaped message
//! history. The sampling hyperparameters are deployment configuration,
//! not user-selectable.

mod client;
mod config;

pub use client::CharacterBackend;
pub use config::{CharacterBackendConfig, CharacterBackendConfigBuilder};
