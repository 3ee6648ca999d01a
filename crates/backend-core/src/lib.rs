//! Core trait and types for LLM backend implementations.
//!
//! This crate provides the shared interface for all chat backend
//! implementations in the Murmur chat service. It defines:
//!
//! - [`Backend`] - The trait that all backend implementations must implement
//! - [`ChatMessage`] - A single role-tagged message in a conversation
//! - [`BackendError`] - Error types for backend operations
//!
//! # Example
//!
//! ```rust
//! use backend_core::{async_trait, Backend, BackendError, ChatMessage};
//!
//! struct MyBackend;
//!
//! #[async_trait]
//! impl Backend for MyBackend {
//!     async fn generate(
//!         &self,
//!         history: &[ChatMessage],
//!         model: &str,
//!     ) -> Result<String, BackendError> {
//!         Ok(format!("({model}) hello"))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "MyBackend"
//!     }
//! }
//! ```

mod error;
mod message;
mod trait_def;

pub use error::BackendError;
pub use message::ChatMessage;
pub use trait_def::Backend;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
