//! Conversation listing, history, export and deletion routes.

use axum::extract::{Path, State};
use axum::Json;
use database::{conversation, message, reaction, Conversation, Message, ReactionCounts};
use serde::Serialize;
use tracing::info;

use crate::auth::UserId;
use crate::error::Result;
use crate::state::AppState;

/// Conversation metadata for listings.
#[derive(Serialize)]
pub struct ConversationInfo {
    pub id: i64,
    pub public_id: String,
    pub summary: Option<String>,
    pub created_at: String,
}

impl From<Conversation> for ConversationInfo {
    fn from(conv: Conversation) -> Self {
        Self {
            id: conv.id,
            public_id: conv.public_id,
            summary: conv.summary,
            created_at: conv.created_at,
        }
    }
}

/// A message as rendered to the client.
#[derive(Serialize)]
pub struct MessageView {
    pub id: i64,
    pub sender: String,
    pub text: Option<String>,
    /// Public URL under the media mount, for image messages.
    pub image_url: Option<String>,
    pub created_at: String,
    /// Reaction tallies, present on assistant messages only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactions: Option<ReactionCounts>,
    /// The caller's own reaction, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_reaction: Option<String>,
}

/// Conversation history response.
#[derive(Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<MessageView>,
    pub summary: Option<String>,
}

/// One conversation in an export, with full history.
#[derive(Serialize)]
pub struct ExportConversation {
    #[serde(flatten)]
    pub info: ConversationInfo,
    pub messages: Vec<MessageView>,
}

/// Deletion result.
#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

/// List the caller's conversations, newest first.
pub async fn list(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<Vec<ConversationInfo>>> {
    let conversations = conversation::list_for_user(state.db.pool(), &user_id).await?;
    Ok(Json(
        conversations.into_iter().map(ConversationInfo::from).collect(),
    ))
}

/// Full history of one conversation, with reaction state.
pub async fn messages(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(conversation_id): Path<i64>,
) -> Result<Json<MessagesResponse>> {
    let conv = conversation::get_for_user(state.db.pool(), conversation_id, &user_id).await?;
    let messages = render_messages(&state, &user_id, conv.id, true).await?;

    Ok(Json(MessagesResponse {
        messages,
        summary: conv.summary,
    }))
}

/// Delete one conversation and its messages.
pub async fn delete(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(conversation_id): Path<i64>,
) -> Result<Json<DeletedResponse>> {
    conversation::delete_for_user(state.db.pool(), conversation_id, &user_id).await?;
    info!(conversation_id, "conversation deleted");
    Ok(Json(DeletedResponse { deleted: 1 }))
}

/// Delete all of the caller's conversations.
pub async fn delete_all(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<DeletedResponse>> {
    let deleted = conversation::delete_all_for_user(state.db.pool(), &user_id).await?;
    info!(deleted, "conversations cleared");
    Ok(Json(DeletedResponse { deleted }))
}

/// Export every conversation with full history.
pub async fn export(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<Vec<ExportConversation>>> {
    let conversations = conversation::list_for_user(state.db.pool(), &user_id).await?;

    let mut out = Vec::with_capacity(conversations.len());
    for conv in conversations {
        let messages = render_messages(&state, &user_id, conv.id, false).await?;
        out.push(ExportConversation {
            info: ConversationInfo::from(conv),
            messages,
        });
    }

    Ok(Json(out))
}

/// Public read-only view of a shared conversation.
///
/// Unauthenticated: lookup is by the unguessable public id, and no
/// owner or reaction data leaks into the response.
pub async fn share(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Json<MessagesResponse>> {
    let conv = conversation::get_by_public_id(state.db.pool(), &public_id).await?;
    let messages = message::list(state.db.pool(), conv.id).await?;

    Ok(Json(MessagesResponse {
        messages: messages.into_iter().map(plain_view).collect(),
        summary: conv.summary,
    }))
}

async fn render_messages(
    state: &AppState,
    user_id: &str,
    conversation_id: i64,
    with_reactions: bool,
) -> Result<Vec<MessageView>> {
    let messages = message::list(state.db.pool(), conversation_id).await?;

    let mut views = Vec::with_capacity(messages.len());
    for msg in messages {
        let (reactions, my_reaction) = if with_reactions && msg.is_assistant() {
            let counts = reaction::counts(state.db.pool(), msg.id).await?;
            let mine = reaction::for_user(state.db.pool(), msg.id, user_id).await?;
            (Some(counts), mine)
        } else {
            (None, None)
        };

        let mut view = plain_view(msg);
        view.reactions = reactions;
        view.my_reaction = my_reaction;
        views.push(view);
    }

    Ok(views)
}

fn plain_view(msg: Message) -> MessageView {
    MessageView {
        id: msg.id,
        sender: msg.sender,
        text: msg.text,
        image_url: msg.image_path.as_deref().map(orchestrator::media_url),
        created_at: msg.created_at,
        reactions: None,
        my_reaction: None,
    }
}
