//! Static backend - always returns the same reply.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use backend_core::{Backend, BackendError, ChatMessage};

/// A backend that always answers with a fixed reply.
///
/// Counts invocations so tests can assert how often the pipeline called
/// the provider.
#[derive(Debug, Default)]
pub struct StaticBackend {
    reply: String,
    calls: AtomicUsize,
}

impl StaticBackend {
    /// Create a new StaticBackend with the given reply.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `generate` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for StaticBackend {
    async fn generate(
        &self,
        _history: &[ChatMessage],
        _model: &str,
    ) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "StaticBackend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_reply_and_call_count() {
        let backend = StaticBackend::new("fixed");
        let history = vec![ChatMessage::user("anything")];

        assert_eq!(backend.generate(&history, "m").await.unwrap(), "fixed");
        assert_eq!(backend.generate(&history, "m").await.unwrap(), "fixed");
        assert_eq!(backend.calls(), 2);
    }
}
