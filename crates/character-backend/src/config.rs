//! Configuration for the character backend.

use backend_core::BackendError;
use std::env;
use std::time::Duration;

/// Default sampling parameters for character chat.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_TOP_P: f32 = 0.75;
pub const DEFAULT_FREQUENCY_PENALTY: f32 = 0.45;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the character backend.
#[derive(Debug, Clone)]
pub struct CharacterBackendConfig {
    /// Chat completions endpoint of the text-generation service.
    pub api_url: String,

    /// Temperature for generation.
    pub temperature: f32,

    /// Maximum tokens for response.
    pub max_tokens: u32,

    /// Nucleus sampling threshold.
    pub top_p: f32,

    /// Frequency penalty.
    pub frequency_penalty: f32,

    /// Marker after which generated text is cut off, when the character
    /// card leaks the user persona back into the completion.
    pub stop_marker: Option<String>,

    /// Request timeout.
    pub timeout: Duration,
}

impl CharacterBackendConfig {
    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `CHARACTER_API_URL` - chat completions endpoint of the service
    ///
    /// Optional:
    /// - `CHARACTER_TEMPERATURE` - Temperature (default: 0.7)
    /// - `CHARACTER_MAX_TOKENS` - Max tokens (default: 150)
    /// - `CHARACTER_TOP_P` - Nucleus sampling threshold (default: 0.75)
    /// - `CHARACTER_FREQUENCY_PENALTY` - Frequency penalty (default: 0.45)
    /// - `CHARACTER_STOP_MARKER` - Completion cut-off marker (default: unset)
    /// - `CHARACTER_TIMEOUT_SECS` - Request timeout (default: 120)
    pub fn from_env() -> Result<Self, BackendError> {
        let api_url = env::var("CHARACTER_API_URL")
            .map_err(|_| BackendError::Configuration("CHARACTER_API_URL not set".to_string()))?;

        let temperature = env::var("CHARACTER_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TEMPERATURE);

        let max_tokens = env::var("CHARACTER_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);

        let top_p = env::var("CHARACTER_TOP_P")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TOP_P);

        let frequency_penalty = env::var("CHARACTER_FREQUENCY_PENALTY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_FREQUENCY_PENALTY);

        let stop_marker = env::var("CHARACTER_STOP_MARKER").ok().filter(|v| !v.is_empty());

        let timeout_secs = env::var("CHARACTER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_url,
            temperature,
            max_tokens,
            top_p,
            frequency_penalty,
            stop_marker,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Create a new config builder.
    pub fn builder(api_url: impl Into<String>) -> CharacterBackendConfigBuilder {
        CharacterBackendConfigBuilder {
            config: CharacterBackendConfig {
                api_url: api_url.into(),
                temperature: DEFAULT_TEMPERATURE,
                max_tokens: DEFAULT_MAX_TOKENS,
                top_p: DEFAULT_TOP_P,
                frequency_penalty: DEFAULT_FREQUENCY_PENALTY,
                stop_marker: None,
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            },
        }
    }
}

/// Builder for CharacterBackendConfig.
#[derive(Debug)]
pub struct CharacterBackendConfigBuilder {
    config: CharacterBackendConfig,
}

impl CharacterBackendConfigBuilder {
    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = temp;
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = tokens;
        self
    }

    /// Set the nucleus sampling threshold.
    pub fn top_p(mut self, top_p: f32) -> Self {
        self.config.top_p = top_p;
        self
    }

    /// Set the frequency penalty.
    pub fn frequency_penalty(mut self, penalty: f32) -> Self {
        self.config.frequency_penalty = penalty;
        self
    }

    /// Set the completion cut-off marker.
    pub fn stop_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.stop_marker = Some(marker.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> CharacterBackendConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = CharacterBackendConfig::builder("http://localhost:5000/v1/chat/completions")
            .build();

        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.top_p, DEFAULT_TOP_P);
        assert_eq!(config.frequency_penalty, DEFAULT_FREQUENCY_PENALTY);
        assert!(config.stop_marker.is_none());
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_vars() {
            for var in [
                "CHARACTER_API_URL",
                "CHARACTER_TEMPERATURE",
                "CHARACTER_MAX_TOKENS",
                "CHARACTER_TOP_P",
                "CHARACTER_FREQUENCY_PENALTY",
                "CHARACTER_STOP_MARKER",
                "CHARACTER_TIMEOUT_SECS",
            ] {
                std::env::remove_var(var);
            }
        }

        // Missing URL should error
        clear_vars();
        let result = CharacterBackendConfig::from_env();
        assert!(matches!(result, Err(BackendError::Configuration(_))));

        // Only URL set, defaults used
        std::env::set_var("CHARACTER_API_URL", "http://localhost:5000/v1/chat/completions");
        let config = CharacterBackendConfig::from_env().unwrap();
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert!(config.stop_marker.is_none());

        // Overrides are read
        std::env::set_var("CHARACTER_MAX_TOKENS", "300");
        std::env::set_var("CHARACTER_STOP_MARKER", "User:");
        let config = CharacterBackendConfig::from_env().unwrap();
        assert_eq!(config.max_tokens, 300);
        assert_eq!(config.stop_marker.as_deref(), Some("User:"));

        clear_vars();
    }
}
