//! Configuration for the OpenAI-protocol backend.

use backend_core::BackendError;
use std::env;
use std::time::Duration;

/// Default request timeout in seconds.
///
/// The providers this service talks to can take a long time on cold
/// models, but an unbounded wait pins a worker forever.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for one OpenAI-protocol provider family.
#[derive(Debug, Clone)]
pub struct OpenAiBackendConfig {
    /// Family label used in logs and `Backend::name` ("nebius", "ollama", "openai").
    pub label: String,

    /// Base API URL, up to and including the version segment
    /// (e.g. `https://api.studio.nebius.ai/v1`).
    pub api_url: String,

    /// Bearer credential. Not all families require one (Ollama doesn't).
    pub api_key: Option<String>,

    /// Maximum tokens for response, when the deployment caps it.
    pub max_tokens: Option<u32>,

    /// Temperature for generation.
    pub temperature: Option<f32>,

    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAiBackendConfig {
    /// Configuration for the Nebius family from environment variables.
    ///
    /// Required:
    /// - `NEBIUS_API_KEY` - API key for authentication
    ///
    /// Optional:
    /// - `NEBIUS_API_URL` - API URL (default: https://api.studio.nebius.ai/v1)
    /// - `NEBIUS_MAX_TOKENS` - Max tokens (default: unset)
    /// - `NEBIUS_TEMPERATURE` - Temperature (default: unset)
    /// - `NEBIUS_TIMEOUT_SECS` - Request timeout (default: 120)
    pub fn nebius_from_env() -> Result<Self, BackendError> {
        Self::family_from_env(
            "nebius",
            "NEBIUS",
            "https://api.studio.nebius.ai/v1",
            true,
        )
    }

    /// Configuration for a local Ollama deployment from environment variables.
    ///
    /// Optional:
    /// - `OLLAMA_API_URL` - API URL (default: http://127.0.0.1:11434/v1)
    /// - `OLLAMA_API_KEY` - API key, if the deployment is fronted by one
    /// - `OLLAMA_MAX_TOKENS`, `OLLAMA_TEMPERATURE`, `OLLAMA_TIMEOUT_SECS`
    pub fn ollama_from_env() -> Result<Self, BackendError> {
        Self::family_from_env("ollama", "OLLAMA", "http://127.0.0.1:11434/v1", false)
    }

    /// Configuration for the OpenAI family from environment variables.
    ///
    /// Required:
    /// - `OPENAI_API_KEY` - API key for authentication
    ///
    /// Optional:
    /// - `OPENAI_API_URL` - API URL (default: https://api.openai.com/v1)
    /// - `OPENAI_MAX_TOKENS`, `OPENAI_TEMPERATURE`, `OPENAI_TIMEOUT_SECS`
    pub fn openai_from_env() -> Result<Self, BackendError> {
        Self::family_from_env("openai", "OPENAI", "https://api.openai.com/v1", true)
    }

    fn family_from_env(
        label: &str,
        prefix: &str,
        default_url: &str,
        key_required: bool,
    ) -> Result<Self, BackendError> {
        let api_key = env::var(format!("{prefix}_API_KEY")).ok();
        if key_required && api_key.is_none() {
            return Err(BackendError::Configuration(format!(
                "{prefix}_API_KEY not set"
            )));
        }

        let api_url =
            env::var(format!("{prefix}_API_URL")).unwrap_or_else(|_| default_url.to_string());

        let max_tokens = env::var(format!("{prefix}_MAX_TOKENS"))
            .ok()
            .and_then(|v| v.parse().ok());

        let temperature = env::var(format!("{prefix}_TEMPERATURE"))
            .ok()
            .and_then(|v| v.parse().ok());

        let timeout_secs = env::var(format!("{prefix}_TIMEOUT_SECS"))
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            label: label.to_string(),
            api_url,
            api_key,
            max_tokens,
            temperature,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Create a new config builder.
    pub fn builder(label: impl Into<String>, api_url: impl Into<String>) -> OpenAiBackendConfigBuilder {
        OpenAiBackendConfigBuilder {
            config: OpenAiBackendConfig {
                label: label.into(),
                api_url: api_url.into(),
                api_key: None,
                max_tokens: None,
                temperature: None,
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            },
        }
    }
}

/// Builder for OpenAiBackendConfig.
#[derive(Debug)]
pub struct OpenAiBackendConfigBuilder {
    config: OpenAiBackendConfig,
}

impl OpenAiBackendConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OpenAiBackendConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = OpenAiBackendConfig::builder("nebius", "https://example.test/v1").build();

        assert_eq!(config.label, "nebius");
        assert_eq!(config.api_url, "https://example.test/v1");
        assert!(config.api_key.is_none());
        assert!(config.max_tokens.is_none());
        assert!(config.temperature.is_none());
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_builder_all_options() {
        let config = OpenAiBackendConfig::builder("openai", "https://api.openai.com/v1")
            .api_key("my-key")
            .max_tokens(256)
            .temperature(0.4)
            .timeout(Duration::from_secs(30))
            .build();

        assert_eq!(config.api_key.as_deref(), Some("my-key"));
        assert_eq!(config.max_tokens, Some(256));
        assert_eq!(config.temperature, Some(0.4));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_family_vars(prefix: &str) {
            for suffix in ["API_KEY", "API_URL", "MAX_TOKENS", "TEMPERATURE", "TIMEOUT_SECS"] {
                std::env::remove_var(format!("{prefix}_{suffix}"));
            }
        }

        // Nebius requires a key
        clear_family_vars("NEBIUS");
        let result = OpenAiBackendConfig::nebius_from_env();
        assert!(matches!(result, Err(BackendError::Configuration(_))));

        // With a key, defaults apply
        std::env::set_var("NEBIUS_API_KEY", "test-key");
        let config = OpenAiBackendConfig::nebius_from_env().unwrap();
        assert_eq!(config.api_url, "https://api.studio.nebius.ai/v1");
        assert_eq!(config.api_key.as_deref(), Some("test-key"));
        clear_family_vars("NEBIUS");

        // Ollama works without a key
        clear_family_vars("OLLAMA");
        let config = OpenAiBackendConfig::ollama_from_env().unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:11434/v1");
        assert!(config.api_key.is_none());

        // Overrides are read
        std::env::set_var("OLLAMA_API_URL", "http://10.0.0.2:11434/v1");
        std::env::set_var("OLLAMA_MAX_TOKENS", "512");
        std::env::set_var("OLLAMA_TIMEOUT_SECS", "15");
        let config = OpenAiBackendConfig::ollama_from_env().unwrap();
        assert_eq!(config.api_url, "http://10.0.0.2:11434/v1");
        assert_eq!(config.max_tokens, Some(512));
        assert_eq!(config.timeout, Duration::from_secs(15));
        clear_family_vars("OLLAMA");
    }
}
