//! Turn submission routes.

use axum::extract::{Path, State};
use axum::Json;
use orchestrator::{ImageTurnResponse, TurnResponse};
use serde::Deserialize;

use crate::auth::UserId;
use crate::error::Result;
use crate::state::AppState;

/// Request to submit a text turn.
#[derive(Deserialize)]
pub struct MessageRequest {
    pub message: String,
    /// Omitted to start a new conversation.
    pub conversation_id: Option<i64>,
}

/// Request to submit an image turn.
#[derive(Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    /// Omitted to start a new conversation.
    pub conversation_id: Option<i64>,
}

/// Submit a text turn.
pub async fn submit_message(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(req): Json<MessageRequest>,
) -> Result<Json<TurnResponse>> {
    let turn = state
        .orchestrator
        .submit_text(&user_id, req.conversation_id, &req.message)
        .await?;
    Ok(Json(turn))
}

/// Regenerate the latest assistant reply in a conversation.
pub async fn regenerate(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(conversation_id): Path<i64>,
) -> Result<Json<TurnResponse>> {
    let turn = state
        .orchestrator
        .regenerate(&user_id, conversation_id)
        .await?;
    Ok(Json(turn))
}

/// Submit an image turn.
pub async fn submit_image(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(req): Json<ImageRequest>,
) -> Result<Json<ImageTurnResponse>> {
    let turn = state
        .orchestrator
        .submit_image(&user_id, req.conversation_id, &req.prompt)
        .await?;
    Ok(Json(turn))
}
