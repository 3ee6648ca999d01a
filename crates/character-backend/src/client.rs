//! CharacterBackend implementation.

use backend_core::{async_trait, Backend, BackendError, ChatMessage};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::CharacterBackendConfig;

/// Chat request for the text-generation service.
#[derive(Debug, Clone, Serialize)]
struct CharacterChatRequest {
    messages: Vec<ChatMessage>,
    mode: &'static str,
    character: String,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
}

/// Response body; the service mirrors the OpenAI choice layout.
#[derive(Debug, Clone, Deserialize)]
struct CharacterChatResponse {
    #[serde(default)]
    choices: Vec<CharacterChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct CharacterChoice {
    message: CharacterChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct CharacterChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// A backend that talks to a character-based text-generation service.
///
/// The `model` argument of [`Backend::generate`] carries the selected
/// character name rather than a model identifier.
pub struct CharacterBackend {
    client: Client,
    config: CharacterBackendConfig,
}

impl CharacterBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: CharacterBackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                BackendError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!("CharacterBackend initialized for {}", config.api_url);

        Ok(Self { client, config })
    }

    /// Create a backend from environment variables.
    ///
    /// See [`CharacterBackendConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, BackendError> {
        Self::new(CharacterBackendConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &CharacterBackendConfig {
        &self.config
    }

    /// Cut the completion at the configured stop marker, if present.
    fn apply_stop_marker(&self, text: &str) -> String {
        match &self.config.stop_marker {
            Some(marker) if text.contains(marker.as_str()) => text
                .split(marker.as_str())
                .next()
                .unwrap_or(text)
                .trim()
                .to_string(),
            _ => text.trim().to_string(),
        }
    }
}

#[async_trait]
impl Backend for CharacterBackend {
    async fn generate(
        &self,
        history: &[ChatMessage],
        model: &str,
    ) -> Result<String, BackendError> {
        let request = CharacterChatRequest {
            messages: history.to_vec(),
            mode: "chat",
            character: model.to_string(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            top_p: self.config.top_p,
            frequency_penalty: self.config.frequency_penalty,
        };

        debug!("Sending request to character API: {:?}", request);

        let response = self
            .client
            .post(&self.config.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let completion: CharacterChatResponse = response.json().await.map_err(|e| {
            BackendError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        let text = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| {
                BackendError::InvalidResponse("no content in completion".to_string())
            })?;

        Ok(self.apply_stop_marker(text))
    }

    fn name(&self) -> &str {
        "character"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CharacterBackendConfig;

    fn backend_with_marker(marker: Option<&str>) -> CharacterBackend {
        let mut builder = CharacterBackendConfig::builder("http://localhost:5000/v1/chat/completions");
        if let Some(marker) = marker {
            builder = builder.stop_marker(marker);
        }
        CharacterBackend::new(builder.build()).unwrap()
    }

    #[test]
    fn test_apply_stop_marker_cuts_tail() {
        let backend = backend_with_marker(Some("Nick Adam:"));
        let cut = backend.apply_stop_marker("Hello there. Nick Adam: and then I said");
        assert_eq!(cut, "Hello there.");
    }

    #[test]
    fn test_apply_stop_marker_absent_trims_only() {
        let backend = backend_with_marker(Some("Nick Adam:"));
        assert_eq!(backend.apply_stop_marker("  plain reply \n"), "plain reply");
    }

    #[test]
    fn test_no_marker_configured() {
        let backend = backend_with_marker(None);
        assert_eq!(
            backend.apply_stop_marker(" keep Nick Adam: everything "),
            "keep Nick Adam: everything"
        );
    }

    #[tokio::test]
    async fn test_generate_network_failure() {
        let config = CharacterBackendConfig::builder("http://127.0.0.1:1/v1/chat/completions")
            .timeout(std::time::Duration::from_secs(2))
            .build();
        let backend = CharacterBackend::new(config).unwrap();

        let history = vec![ChatMessage::user("hello")];
        let result = backend.generate(&history, "Aria").await;
        assert!(matches!(result, Err(BackendError::Network(_))));
    }
}
