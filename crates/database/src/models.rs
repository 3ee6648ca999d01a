//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Sender tag for user-authored messages.
pub const SENDER_USER: &str = "user";

/// Sender tag for assistant-authored messages.
pub const SENDER_ASSISTANT: &str = "assistant";

/// The backend family a user has selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// Character-based text-generation service.
    Character,
    /// Nebius OpenAI-protocol API.
    Nebius,
    /// Local Ollama deployment.
    Ollama,
    /// OpenAI API.
    OpenAi,
}

impl BackendChoice {
    /// Database/config value for this choice.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendChoice::Character => "character",
            BackendChoice::Nebius => "nebius",
            BackendChoice::Ollama => "ollama",
            BackendChoice::OpenAi => "openai",
        }
    }

    /// Parse a stored value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "character" => Some(BackendChoice::Character),
            "nebius" => Some(BackendChoice::Nebius),
            "ollama" => Some(BackendChoice::Ollama),
            "openai" => Some(BackendChoice::OpenAi),
            _ => None,
        }
    }
}

/// Per-user backend configuration.
///
/// One row per user, created on first access. Exactly one of the model
/// references is semantically active, determined by `backend_choice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// Caller identity (opaque, supplied by the upstream auth layer).
    pub user_id: String,
    /// Selected backend family.
    pub backend_choice: String,
    /// Selected character for the character family.
    pub character_name: Option<String>,
    /// Selected model for the Nebius family.
    pub nebius_model: Option<String>,
    /// Selected model for the Ollama family.
    pub ollama_model: Option<String>,
    /// Selected model for the OpenAI family.
    pub openai_model: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl Profile {
    /// The selected backend family as a typed value.
    pub fn choice(&self) -> Option<BackendChoice> {
        BackendChoice::parse(&self.backend_choice)
    }

    /// The model (or character) reference for the active family, if set.
    pub fn active_model(&self) -> Option<&str> {
        match self.choice()? {
            BackendChoice::Character => self.character_name.as_deref(),
            BackendChoice::Nebius => self.nebius_model.as_deref(),
            BackendChoice::Ollama => self.ollama_model.as_deref(),
            BackendChoice::OpenAi => self.openai_model.as_deref(),
        }
    }
}

/// A conversation owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    /// Internal sequential identifier.
    pub id: i64,
    /// Owner.
    pub user_id: String,
    /// Stable random public identifier (UUIDv4) for the share view.
    pub public_id: String,
    /// Short natural-language summary, set after the first exchange.
    pub summary: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// A message inside a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Message {
    /// Auto-incrementing identifier.
    pub id: i64,
    /// Owning conversation.
    pub conversation_id: i64,
    /// "user" or "assistant".
    pub sender: String,
    /// Message text; None for image-only assistant messages.
    pub text: Option<String>,
    /// Relative media path of an attached generated image.
    pub image_path: Option<String>,
    /// Creation timestamp (ordering key together with id).
    pub created_at: String,
}

impl Message {
    /// Whether this message was authored by the assistant.
    pub fn is_assistant(&self) -> bool {
        self.sender == SENDER_ASSISTANT
    }
}

/// Thumbs up/down totals for one message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub up: i64,
    pub down: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_choice_round_trip() {
        for choice in [
            BackendChoice::Character,
            BackendChoice::Nebius,
            BackendChoice::Ollama,
            BackendChoice::OpenAi,
        ] {
            assert_eq!(BackendChoice::parse(choice.as_str()), Some(choice));
        }
        assert_eq!(BackendChoice::parse("mystery"), None);
    }

    #[test]
    fn test_active_model_follows_choice() {
        let profile = Profile {
            user_id: "u".to_string(),
            backend_choice: "nebius".to_string(),
            character_name: Some("Aria".to_string()),
            nebius_model: Some("llama-70b".to_string()),
            ollama_model: None,
            openai_model: None,
            created_at: String::new(),
            updated_at: String::new(),
        };

        assert_eq!(profile.active_model(), Some("llama-70b"));

        let profile = Profile {
            backend_choice: "ollama".to_string(),
            ..profile
        };
        assert_eq!(profile.active_model(), None);
    }
}
