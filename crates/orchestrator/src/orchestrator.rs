//! Main turn pipeline: admission, routing, persistence, billing, summary.

use std::sync::Arc;

use backend_core::{Backend, ChatMessage};
use murmur_database::{
    conversation, credits, message, Conversation, Database, Message, ReactionCounts, SENDER_USER,
};
use openai_backend::{OpenAiBackend, OpenAiBackendConfig};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::OrchestratorConfig;
use crate::error::OrchestratorError;
use crate::image::ImageGenerator;
use crate::media::MediaStore;
use crate::router::{BackendRouter, BackendSet};
use crate::summary::{summarize_or_placeholder, BackendSummarizer, Summarizer, SUMMARY_MAX_TOKENS};

/// Assistant reply persisted when image generation fails.
const IMAGE_FAILURE_TEXT: &str = "Error: failed to generate image.";

/// Result of a text or regeneration turn.
///
/// Backend failures still produce one of these: `response` then carries
/// the persisted error text and the turn is billed as unsuccessful
/// (no debit).
#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    /// Assistant reply text, or the persisted error text.
    pub response: String,
    /// Conversation the turn landed in (created on demand).
    pub conversation_id: i64,
    /// Current conversation summary, empty until one is generated.
    pub summary: String,
    /// Row id of the assistant message, for reactions.
    pub message_id: i64,
    /// Reaction tallies for the new message, always zero on a fresh turn.
    pub reaction_counts: ReactionCounts,
    /// The caller's reaction on the new message, always absent on a
    /// fresh turn.
    pub user_reaction: Option<String>,
}

/// Result of a successful image turn.
#[derive(Debug, Clone, Serialize)]
pub struct ImageTurnResponse {
    /// Public URL of the stored image, under the `/media` mount.
    pub image_url: String,
    /// Conversation the turn landed in (created on demand).
    pub conversation_id: i64,
    /// Row id of the assistant message carrying the image.
    pub message_id: i64,
}

/// Coordinates a turn across the credit ledger, conversation store,
/// backend router, summarizer and media store.
///
/// All seams are trait objects so tests can run the full pipeline
/// against an in-memory database and mock backends.
pub struct Orchestrator {
    db: Database,
    router: Arc<dyn BackendRouter>,
    summarizer: Arc<dyn Summarizer>,
    images: Option<Arc<dyn ImageGenerator>>,
    media: MediaStore,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create an orchestrator with explicit components.
    pub fn new(
        db: Database,
        router: Arc<dyn BackendRouter>,
        summarizer: Arc<dyn Summarizer>,
        images: Option<Arc<dyn ImageGenerator>>,
        config: OrchestratorConfig,
    ) -> Self {
        let media = MediaStore::new(config.media_root.clone());
        Self {
            db,
            router,
            summarizer,
            images,
            media,
            config,
        }
    }

    /// Create an orchestrator from environment variables.
    ///
    /// Backend families and the diffusion endpoint are optional: missing
    /// configuration downgrades the corresponding feature instead of
    /// failing startup. The summarizer reuses the OpenAI credentials with
    /// its own token-capped client.
    pub fn from_env(db: Database) -> Self {
        let config = OrchestratorConfig::from_env();
        let router = BackendSet::from_env();

        let summarizer: Arc<dyn Summarizer> = match summary_backend_from_env() {
            Some(backend) => Arc::new(BackendSummarizer::new(backend, &config.summary_model)),
            None => {
                warn!("summaries disabled, OpenAI credentials missing");
                Arc::new(BackendSummarizer::disabled())
            }
        };

        let images: Option<Arc<dyn ImageGenerator>> = match diffusion::DiffusionClient::from_env() {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                warn!("image generation disabled: {}", e);
                None
            }
        };

        Self::new(db, Arc::new(router), summarizer, images, config)
    }

    /// Directory the media store writes under, for static serving.
    pub fn media_root(&self) -> &std::path::Path {
        self.media.root()
    }

    /// Current balance for `user_id`, creating the row on first access.
    pub async fn balance(&self, user_id: &str) -> Result<i64, OrchestratorError> {
        let balance =
            credits::get_or_init(self.db.pool(), user_id, self.config.starting_credits).await?;
        Ok(balance)
    }

    /// Process a text turn.
    ///
    /// Stages: validate, admit against the text cost, resolve or create
    /// the conversation, persist the user message, generate, persist the
    /// assistant message (reply or error text), debit on success only,
    /// then summarize if this was the opening exchange.
    pub async fn submit_text(
        &self,
        user_id: &str,
        conversation_id: Option<i64>,
        text: &str,
    ) -> Result<TurnResponse, OrchestratorError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(OrchestratorError::Validation("message is empty".into()));
        }

        let balance = self.balance(user_id).await?;
        if balance < self.config.text_turn_cost {
            return Err(OrchestratorError::InsufficientCredits);
        }

        let conversation = self.resolve_conversation(user_id, conversation_id).await?;
        message::append_text(self.db.pool(), conversation.id, SENDER_USER, text).await?;

        self.generate_and_persist(user_id, &conversation, text).await
    }

    /// Regenerate the latest assistant reply.
    ///
    /// Deletes the newest assistant message, requires the newest remaining
    /// message to be user-authored, and re-runs generation, billing and
    /// summarization on the trimmed history.
    pub async fn regenerate(
        &self,
        user_id: &str,
        conversation_id: i64,
    ) -> Result<TurnResponse, OrchestratorError> {
        let balance = self.balance(user_id).await?;
        if balance < self.config.text_turn_cost {
            return Err(OrchestratorError::InsufficientCredits);
        }

        let conversation =
            conversation::get_for_user(self.db.pool(), conversation_id, user_id).await?;

        message::delete_latest_assistant(self.db.pool(), conversation.id).await?;

        let latest = message::latest(self.db.pool(), conversation.id).await?;
        let user_text = match latest {
            Some(ref msg) if !msg.is_assistant() => msg.text.clone().unwrap_or_default(),
            _ => return Err(OrchestratorError::NoUserMessage),
        };

        self.generate_and_persist(user_id, &conversation, &user_text)
            .await
    }

    /// Process an image turn.
    ///
    /// On generation failure the prompt stays persisted, an assistant
    /// error message is appended, nothing is debited, and the failure is
    /// also surfaced as [`OrchestratorError::ImageGeneration`].
    pub async fn submit_image(
        &self,
        user_id: &str,
        conversation_id: Option<i64>,
        prompt: &str,
    ) -> Result<ImageTurnResponse, OrchestratorError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(OrchestratorError::Validation("prompt is empty".into()));
        }

        let balance = self.balance(user_id).await?;
        if balance < self.config.image_turn_cost {
            return Err(OrchestratorError::InsufficientImageCredits {
                required: self.config.image_turn_cost,
            });
        }

        let conversation = self.resolve_conversation(user_id, conversation_id).await?;
        message::append_text(self.db.pool(), conversation.id, SENDER_USER, prompt).await?;

        let generated = match &self.images {
            Some(generator) => generator.generate(prompt).await.map_err(|e| e.to_string()),
            None => Err("image generation is not configured".to_string()),
        };

        let bytes = match generated {
            Ok(bytes) => bytes,
            Err(reason) => {
                warn!(conversation_id = conversation.id, "image turn failed: {}", reason);
                message::append_text(
                    self.db.pool(),
                    conversation.id,
                    murmur_database::SENDER_ASSISTANT,
                    IMAGE_FAILURE_TEXT,
                )
                .await?;
                return Err(OrchestratorError::ImageGeneration(reason));
            }
        };

        let image_path = self.media.save_png(&bytes).await?;
        let stored = message::append_image(self.db.pool(), conversation.id, &image_path).await?;
        self.debit(user_id, self.config.image_turn_cost).await?;

        info!(
            conversation_id = conversation.id,
            message_id = stored.id,
            "image turn complete"
        );

        Ok(ImageTurnResponse {
            image_url: crate::media::media_url(&image_path),
            conversation_id: conversation.id,
            message_id: stored.id,
        })
    }

    /// Shared tail of the text and regeneration paths: generate against
    /// the full history, persist the outcome, bill, summarize.
    async fn generate_and_persist(
        &self,
        user_id: &str,
        conversation: &Conversation,
        user_text: &str,
    ) -> Result<TurnResponse, OrchestratorError> {
        let profile = murmur_database::profile::get_or_create(self.db.pool(), user_id).await?;
        let history = message::list(self.db.pool(), conversation.id).await?;
        let chat_history = to_chat_history(&history);

        let (response_text, generated) =
            match self.router.generate(&profile, &chat_history).await {
                Ok(reply) => (reply, true),
                Err(e) => {
                    warn!(conversation_id = conversation.id, "backend failed: {}", e);
                    (e.user_message(), false)
                }
            };

        let stored = message::append_text(
            self.db.pool(),
            conversation.id,
            murmur_database::SENDER_ASSISTANT,
            &response_text,
        )
        .await?;

        if generated {
            self.debit(user_id, self.config.text_turn_cost).await?;
        }

        let summary = self
            .maybe_summarize(conversation, user_text, &response_text)
            .await?;

        info!(
            conversation_id = conversation.id,
            message_id = stored.id,
            generated,
            "text turn complete"
        );

        Ok(TurnResponse {
            response: response_text,
            conversation_id: conversation.id,
            summary,
            message_id: stored.id,
            reaction_counts: ReactionCounts::default(),
            user_reaction: None,
        })
    }

    async fn resolve_conversation(
        &self,
        user_id: &str,
        conversation_id: Option<i64>,
    ) -> Result<Conversation, OrchestratorError> {
        let conversation = match conversation_id {
            Some(id) => conversation::get_for_user(self.db.pool(), id, user_id).await?,
            None => conversation::create(self.db.pool(), user_id).await?,
        };
        Ok(conversation)
    }

    /// Conditional debit. A failed debit (balance raced below the cost)
    /// is logged, not fatal: the reply was already delivered.
    async fn debit(&self, user_id: &str, cost: i64) -> Result<(), OrchestratorError> {
        let debited = credits::try_debit(self.db.pool(), user_id, cost).await?;
        if !debited {
            warn!(user_id, cost, "debit skipped, balance raced below cost");
        }
        Ok(())
    }

    /// Generate and store a summary iff the conversation just reached its
    /// second message. Returns the summary to report for this turn.
    async fn maybe_summarize(
        &self,
        conversation: &Conversation,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<String, OrchestratorError> {
        let count = conversation::message_count(self.db.pool(), conversation.id).await?;
        if count != 2 {
            return Ok(conversation.summary.clone().unwrap_or_default());
        }

        let summary =
            summarize_or_placeholder(self.summarizer.as_ref(), user_text, assistant_text).await;
        conversation::set_summary(self.db.pool(), conversation.id, &summary).await?;
        Ok(summary)
    }
}

/// Map stored messages to backend chat history. Image-only messages
/// carry no text and are skipped.
fn to_chat_history(messages: &[Message]) -> Vec<ChatMessage> {
    messages
        .iter()
        .filter_map(|msg| {
            let text = msg.text.as_deref()?;
            Some(if msg.is_assistant() {
                ChatMessage::assistant(text)
            } else {
                ChatMessage::user(text)
            })
        })
        .collect()
}

/// Build the token-capped OpenAI client used for summaries.
fn summary_backend_from_env() -> Option<Arc<dyn Backend>> {
    let mut config = OpenAiBackendConfig::openai_from_env().ok()?;
    config.max_tokens = Some(SUMMARY_MAX_TOKENS);
    match OpenAiBackend::new(config) {
        Ok(backend) => Some(Arc::new(backend)),
        Err(e) => {
            warn!("summary backend unavailable: {}", e);
            None
        }
    }
}
