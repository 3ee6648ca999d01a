//! Backend routing from profile state.

use std::sync::Arc;

use backend_core::{async_trait, Backend, BackendError, ChatMessage};
use character_backend::{CharacterBackend, CharacterBackendConfig};
use murmur_database::{BackendChoice, Profile};
use openai_backend::{OpenAiBackend, OpenAiBackendConfig};
use tracing::{info, warn};

/// Routes a turn to the backend selected in the caller's profile.
///
/// The production implementation is [`BackendSet`]; tests substitute
/// fixed or failing routers.
#[async_trait]
pub trait BackendRouter: Send + Sync {
    /// Generate a reply for `history` using the backend and model named
    /// in `profile`.
    async fn generate(
        &self,
        profile: &Profile,
        history: &[ChatMessage],
    ) -> Result<String, BackendError>;
}

/// The full set of configured backend clients, one slot per family.
///
/// A family whose configuration is absent at startup stays `None`; a
/// turn routed to it fails with [`BackendError::Configuration`], which
/// the orchestrator persists as the assistant reply.
pub struct BackendSet {
    character: Option<Arc<CharacterBackend>>,
    nebius: Option<Arc<OpenAiBackend>>,
    ollama: Option<Arc<OpenAiBackend>>,
    openai: Option<Arc<OpenAiBackend>>,
}

impl BackendSet {
    /// Create a set with explicit clients. Any slot may be `None`.
    pub fn new(
        character: Option<CharacterBackend>,
        nebius: Option<OpenAiBackend>,
        ollama: Option<OpenAiBackend>,
        openai: Option<OpenAiBackend>,
    ) -> Self {
        Self {
            character: character.map(Arc::new),
            nebius: nebius.map(Arc::new),
            ollama: ollama.map(Arc::new),
            openai: openai.map(Arc::new),
        }
    }

    /// Build every family whose environment configuration is present.
    ///
    /// Missing configuration downgrades the family to unavailable with a
    /// warning instead of failing startup, so a deployment can run with
    /// any subset of providers.
    pub fn from_env() -> Self {
        let character = match CharacterBackendConfig::from_env().and_then(CharacterBackend::new) {
            Ok(backend) => Some(Arc::new(backend)),
            Err(e) => {
                warn!("character backend unavailable: {}", e);
                None
            }
        };
        let nebius = family_from_env(OpenAiBackendConfig::nebius_from_env());
        let ollama = family_from_env(OpenAiBackendConfig::ollama_from_env());
        let openai = family_from_env(OpenAiBackendConfig::openai_from_env());

        info!(
            character = character.is_some(),
            nebius = nebius.is_some(),
            ollama = ollama.is_some(),
            openai = openai.is_some(),
            "backend set initialized"
        );

        Self {
            character,
            nebius,
            ollama,
            openai,
        }
    }

    /// The shared OpenAI client, if configured. Used for summaries.
    pub fn openai(&self) -> Option<Arc<OpenAiBackend>> {
        self.openai.clone()
    }

    /// Resolve `profile` to a backend client and model name.
    fn resolve(&self, profile: &Profile) -> Result<(Arc<dyn Backend>, String), BackendError> {
        let choice = profile.choice().ok_or_else(|| {
            BackendError::Configuration(format!(
                "unknown backend choice '{}'",
                profile.backend_choice
            ))
        })?;

        let model = profile.active_model().ok_or_else(|| {
            BackendError::Configuration(match choice {
                BackendChoice::Character => "no character selected".to_string(),
                other => format!("no {} model selected", other.as_str()),
            })
        })?;

        let backend: Arc<dyn Backend> = match choice {
            BackendChoice::Character => self.character.clone().map(|b| b as _),
            BackendChoice::Nebius => self.nebius.clone().map(|b| b as _),
            BackendChoice::Ollama => self.ollama.clone().map(|b| b as _),
            BackendChoice::OpenAi => self.openai.clone().map(|b| b as _),
        }
        .ok_or_else(|| {
            BackendError::Configuration(format!("{} backend is not configured", choice.as_str()))
        })?;

        Ok((backend, model.to_string()))
    }
}

#[async_trait]
impl BackendRouter for BackendSet {
    async fn generate(
        &self,
        profile: &Profile,
        history: &[ChatMessage],
    ) -> Result<String, BackendError> {
        let (backend, model) = self.resolve(profile)?;
        info!(backend = backend.name(), model = %model, "dispatching turn");
        backend.generate(history, &model).await
    }
}

fn family_from_env(
    config: Result<OpenAiBackendConfig, BackendError>,
) -> Option<Arc<OpenAiBackend>> {
    match config.and_then(OpenAiBackend::new) {
        Ok(backend) => Some(Arc::new(backend)),
        Err(e) => {
            warn!("backend unavailable: {}", e);
            None
        }
    }
}
