//! Conversation summaries.
//!
//! A summary is generated exactly once per conversation, when the second
//! message lands (the first user/assistant exchange). Failures degrade to
//! a fixed placeholder so a broken summary provider never fails a turn.

use std::sync::Arc;

use backend_core::{async_trait, Backend, BackendError, ChatMessage};
use tracing::warn;

/// Stored when the summary provider fails or is not configured.
pub const SUMMARY_PLACEHOLDER: &str = "No summary available.";

/// Maximum tokens requested for a summary completion.
pub const SUMMARY_MAX_TOKENS: u32 = 25;

/// Produces a one-sentence summary of the opening exchange.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<String, BackendError>;
}

/// Summarizer backed by a chat backend and a fixed model.
///
/// Built disabled when no OpenAI-compatible client is available, in which
/// case every call yields the placeholder path.
pub struct BackendSummarizer {
    backend: Option<Arc<dyn Backend>>,
    model: String,
}

impl BackendSummarizer {
    pub fn new(backend: Arc<dyn Backend>, model: impl Into<String>) -> Self {
        Self {
            backend: Some(backend),
            model: model.into(),
        }
    }

    /// A summarizer that always fails with a configuration error.
    pub fn disabled() -> Self {
        Self {
            backend: None,
            model: String::new(),
        }
    }
}

#[async_trait]
impl Summarizer for BackendSummarizer {
    async fn summarize(
        &self,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<String, BackendError> {
        let backend = self.backend.as_ref().ok_or_else(|| {
            BackendError::Configuration("summary backend is not configured".to_string())
        })?;

        let prompt = format!(
            "Summarize the following conversation between a user and an assistant \
             in one sentence:\n\nUser: {user_text}\nAssistant: {assistant_text}\n\nSummary:"
        );
        let history = [
            ChatMessage::system("You are a helpful assistant that summarizes conversations."),
            ChatMessage::user(prompt),
        ];

        backend.generate(&history, &self.model).await
    }
}

/// Run `summarizer` and fall back to [`SUMMARY_PLACEHOLDER`] on failure.
pub(crate) async fn summarize_or_placeholder(
    summarizer: &dyn Summarizer,
    user_text: &str,
    assistant_text: &str,
) -> String {
    match summarizer.summarize(user_text, assistant_text).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!("summary generation failed: {}", e);
            SUMMARY_PLACEHOLDER.to_string()
        }
    }
}
