//! The Backend trait definition.

use async_trait::async_trait;

use crate::error::BackendError;
use crate::message::ChatMessage;

/// A trait for generating an assistant reply from conversation history.
///
/// Implementations wrap one external provider family. The trait is
/// object-safe and can be used with `Box<dyn Backend>` or `Arc<dyn Backend>`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Generate a completion for the given history.
    ///
    /// # Arguments
    ///
    /// * `history` - The ordered conversation so far, oldest first. The
    ///   newest entry is the user turn being answered.
    /// * `model` - The provider-specific model or character identifier
    ///   selected in the caller's profile.
    ///
    /// # Returns
    ///
    /// The generated text with surrounding whitespace trimmed, or a typed
    /// failure. Implementations attempt the provider call exactly once;
    /// retry policy belongs to the caller.
    async fn generate(
        &self,
        history: &[ChatMessage],
        model: &str,
    ) -> Result<String, BackendError>;

    /// Get a human-readable name for this backend implementation.
    fn name(&self) -> &str;
}

impl std::fmt::Debug for dyn Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend").field("name", &self.name()).finish()
    }
}
