//! Echo backend - answers with the newest user message.

use async_trait::async_trait;
use backend_core::{Backend, BackendError, ChatMessage};

/// A backend that echoes the newest user message back.
///
/// Useful for asserting that the pipeline hands the full role-mapped
/// history to the adapter.
#[derive(Debug, Clone, Default)]
pub struct EchoBackend {
    /// Optional prefix to add before the echo.
    prefix: Option<String>,
}

impl EchoBackend {
    /// Create a new EchoBackend with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new EchoBackend with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

#[async_trait]
impl Backend for EchoBackend {
    async fn generate(
        &self,
        history: &[ChatMessage],
        _model: &str,
    ) -> Result<String, BackendError> {
        let last_user = history
            .iter()
            .rev()
            .find(|msg| msg.role == "user")
            .map(|msg| msg.content.as_str())
            .unwrap_or_default();

        let reply = match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, last_user),
            None => last_user.to_string(),
        };

        Ok(reply)
    }

    fn name(&self) -> &str {
        "EchoBackend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_last_user_message() {
        let backend = EchoBackend::new();
        let history = vec![
            ChatMessage::user("first"),
            ChatMessage::assistant("reply"),
            ChatMessage::user("second"),
        ];

        assert_eq!(backend.generate(&history, "m").await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_echo_with_prefix() {
        let backend = EchoBackend::with_prefix("Echo: ");
        let history = vec![ChatMessage::user("Hello!")];

        assert_eq!(
            backend.generate(&history, "m").await.unwrap(),
            "Echo: Hello!"
        );
    }
}
