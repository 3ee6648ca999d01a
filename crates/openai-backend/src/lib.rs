//! OpenAI-protocol chat backend.
//!
//! One client covers every provider family that speaks the standard
//! `/chat/completions` protocol: Nebius, Ollama, and OpenAI itself. The
//! families differ only in base URL, credential requirements, and default
//! sampling parameters, all of which live in [`OpenAiBackendConfig`].

mod api_types;
mod client;
mod config;

pub use api_types::{ChatCompletionRequest, ChatCompletionResponse, Choice, Usage};
pub use client::OpenAiBackend;
pub use config::{OpenAiBackendConfig, OpenAiBackendConfigBuilder};
