//! Failing backend - always returns a chosen error.

use async_trait::async_trait;
use backend_core::{Backend, BackendError, ChatMessage};

/// The kind of failure a [`FailingBackend`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Configuration,
    Network,
    Api,
}

/// A backend that always fails.
#[derive(Debug, Clone)]
pub struct FailingBackend {
    kind: FailureKind,
    message: String,
}

impl FailingBackend {
    /// Fail with a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Configuration,
            message: message.into(),
        }
    }

    /// Fail with a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Network,
            message: message.into(),
        }
    }

    /// Fail with a provider API error (status 500).
    pub fn api(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Api,
            message: message.into(),
        }
    }

    fn error(&self) -> BackendError {
        match self.kind {
            FailureKind::Configuration => BackendError::Configuration(self.message.clone()),
            FailureKind::Network => BackendError::Network(self.message.clone()),
            FailureKind::Api => BackendError::Api {
                status: 500,
                message: self.message.clone(),
            },
        }
    }
}

#[async_trait]
impl Backend for FailingBackend {
    async fn generate(
        &self,
        _history: &[ChatMessage],
        _model: &str,
    ) -> Result<String, BackendError> {
        Err(self.error())
    }

    fn name(&self) -> &str {
        "FailingBackend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failure_kinds() {
        let history = vec![ChatMessage::user("hi")];

        let backend = FailingBackend::network("connection refused");
        assert!(matches!(
            backend.generate(&history, "m").await,
            Err(BackendError::Network(_))
        ));

        let backend = FailingBackend::api("overloaded");
        assert!(matches!(
            backend.generate(&history, "m").await,
            Err(BackendError::Api { status: 500, .. })
        ));
    }
}
