//! OpenAiBackend implementation.

use backend_core::{async_trait, Backend, BackendError, ChatMessage};
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{ApiErrorBody, ChatCompletionRequest, ChatCompletionResponse};
use crate::config::OpenAiBackendConfig;

/// A backend implementation speaking the OpenAI chat-completions protocol.
///
/// One instance serves one provider family; the model identifier comes in
/// per call from the caller's profile.
pub struct OpenAiBackend {
    client: Client,
    config: OpenAiBackendConfig,
}

impl OpenAiBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: OpenAiBackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                BackendError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!(
            "OpenAiBackend ({}) initialized for {}",
            config.label, config.api_url
        );

        Ok(Self { client, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiBackendConfig {
        &self.config
    }

    /// Make a chat completion request to the provider.
    async fn chat_completion(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatCompletionResponse, BackendError> {
        let url = format!("{}/chat/completions", self.config.api_url);

        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending request to {} API: {:?}", self.config.label, request);

        let mut builder = self.client.post(&url).json(&request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BackendError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Providers usually wrap the message in an error object
            let message = match serde_json::from_str::<ApiErrorBody>(&error_text) {
                Ok(body) => body.error.message,
                Err(_) => error_text,
            };

            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            BackendError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        debug!(
            "Received response from {} API: {:?}",
            self.config.label, completion
        );

        Ok(completion)
    }
}

#[async_trait]
impl Backend for OpenAiBackend {
    async fn generate(
        &self,
        history: &[ChatMessage],
        model: &str,
    ) -> Result<String, BackendError> {
        let completion = self.chat_completion(model, history.to_vec()).await?;

        let text = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| {
                BackendError::InvalidResponse("no content in completion".to_string())
            })?
            .trim()
            .to_string();

        if let Some(usage) = completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        &self.config.label
    }
}
