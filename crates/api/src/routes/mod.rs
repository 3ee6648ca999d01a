//! Route handlers for the HTTP API.

pub mod chat;
pub mod conversations;
pub mod health;
pub mod profile;
pub mod reactions;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Turns
        .route("/api/messages", post(chat::submit_message))
        .route("/api/conversations/:id/regenerate", post(chat::regenerate))
        .route("/api/images", post(chat::submit_image))
        // Reactions
        .route("/api/messages/:id/reaction", post(reactions::toggle))
        // Conversations
        .route(
            "/api/conversations",
            get(conversations::list).delete(conversations::delete_all),
        )
        .route("/api/conversations/:id", delete(conversations::delete))
        .route(
            "/api/conversations/:id/messages",
            get(conversations::messages),
        )
        .route("/api/export", get(conversations::export))
        .route("/share/:public_id", get(conversations::share))
        // Profile and catalog
        .route(
            "/api/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/api/models/:family", get(profile::models))
        .route("/api/credits", get(profile::credits_balance))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::{Path, State};
    use axum::Json;
    use backend_core::{async_trait, Backend, BackendError, ChatMessage};
    use database::{catalog, BackendChoice, Database, Profile};
    use mock_backend::StaticBackend;
    use orchestrator::{
        BackendRouter, BackendSummarizer, Orchestrator, OrchestratorConfig, SUMMARY_PLACEHOLDER,
    };

    use super::*;
    use crate::auth::UserId;
    use crate::error::ApiError;

    struct FixedRouter(Arc<dyn Backend>);

    #[async_trait]
    impl BackendRouter for FixedRouter {
        async fn generate(
            &self,
            _profile: &Profile,
            history: &[ChatMessage],
        ) -> Result<String, BackendError> {
            self.0.generate(history, "test-model").await
        }
    }

    async fn test_state() -> AppState {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();

        let orch = Orchestrator::new(
            db.clone(),
            Arc::new(FixedRouter(Arc::new(StaticBackend::new("Hello there.")))),
            Arc::new(BackendSummarizer::disabled()),
            None,
            OrchestratorConfig::default(),
        );

        AppState::new(db, Arc::new(orch))
    }

    fn alice() -> UserId {
        UserId("alice".to_string())
    }

    #[tokio::test]
    async fn submit_then_list_conversations() {
        let state = test_state().await;

        let Json(turn) = chat::submit_message(
            State(state.clone()),
            alice(),
            Json(chat::MessageRequest {
                message: "Hi!".to_string(),
                conversation_id: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(turn.response, "Hello there.");
        assert_eq!(turn.summary, SUMMARY_PLACEHOLDER);

        let Json(conversations) = conversations::list(State(state), alice()).await.unwrap();
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].id, turn.conversation_id);
        assert_eq!(
            conversations[0].summary.as_deref(),
            Some(SUMMARY_PLACEHOLDER)
        );
    }

    #[tokio::test]
    async fn reaction_toggles_on_and_off() {
        let state = test_state().await;

        let Json(turn) = chat::submit_message(
            State(state.clone()),
            alice(),
            Json(chat::MessageRequest {
                message: "Hi!".to_string(),
                conversation_id: None,
            }),
        )
        .await
        .unwrap();

        let Json(on) = reactions::toggle(
            State(state.clone()),
            alice(),
            Path(turn.message_id),
            Json(reactions::ReactionRequest {
                kind: "up".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(on.up, 1);
        assert_eq!(on.my_reaction.as_deref(), Some("up"));

        let Json(off) = reactions::toggle(
            State(state),
            alice(),
            Path(turn.message_id),
            Json(reactions::ReactionRequest {
                kind: "up".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(off.up, 0);
        assert!(off.my_reaction.is_none());
    }

    #[tokio::test]
    async fn reaction_rejects_invalid_kind() {
        let state = test_state().await;

        let err = reactions::toggle(
            State(state),
            alice(),
            Path(1),
            Json(reactions::ReactionRequest {
                kind: "heart".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn profile_update_validates_choice_and_model() {
        let state = test_state().await;

        let err = profile::update_profile(
            State(state.clone()),
            alice(),
            Json(profile::UpdateProfileRequest {
                backend_choice: Some("cohere".to_string()),
                character_name: None,
                nebius_model: None,
                ollama_model: None,
                openai_model: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        catalog::upsert_model(state.db.pool(), BackendChoice::Nebius, "llama-70b")
            .await
            .unwrap();

        let Json(updated) = profile::update_profile(
            State(state),
            alice(),
            Json(profile::UpdateProfileRequest {
                backend_choice: Some("nebius".to_string()),
                character_name: None,
                nebius_model: Some("llama-70b".to_string()),
                ollama_model: None,
                openai_model: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.backend_choice, "nebius");
        assert_eq!(updated.nebius_model.as_deref(), Some("llama-70b"));
    }

    #[tokio::test]
    async fn share_view_needs_no_identity() {
        let state = test_state().await;

        let Json(turn) = chat::submit_message(
            State(state.clone()),
            alice(),
            Json(chat::MessageRequest {
                message: "Hi!".to_string(),
                conversation_id: None,
            }),
        )
        .await
        .unwrap();

        let Json(listed) = conversations::list(State(state.clone()), alice()).await.unwrap();
        let public_id = listed[0].public_id.clone();

        let Json(shared) = conversations::share(State(state), Path(public_id))
            .await
            .unwrap();
        assert_eq!(shared.messages.len(), 2);
        assert_eq!(turn.conversation_id, listed[0].id);
    }

    #[tokio::test]
    async fn models_rejects_unknown_family() {
        let state = test_state().await;

        let err = profile::models(State(state), alice(), Path("huggingface".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn credits_start_at_the_default_grant() {
        let state = test_state().await;

        let Json(credits) = profile::credits_balance(State(state), alice()).await.unwrap();
        assert_eq!(credits.balance, 500);
    }
}
