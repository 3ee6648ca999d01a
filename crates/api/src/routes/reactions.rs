//! Reaction toggle route.

use axum::extract::{Path, State};
use axum::Json;
use database::{message, reaction};
use serde::{Deserialize, Serialize};

use crate::auth::UserId;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Request to toggle a reaction.
#[derive(Deserialize)]
pub struct ReactionRequest {
    /// "up" or "down".
    pub kind: String,
}

/// Reaction state after a toggle.
#[derive(Debug, Serialize)]
pub struct ReactionResponse {
    pub up: i64,
    pub down: i64,
    /// The caller's reaction after the toggle, absent when toggled off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_reaction: Option<String>,
}

/// Toggle the caller's reaction on an assistant message.
pub async fn toggle(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(message_id): Path<i64>,
    Json(req): Json<ReactionRequest>,
) -> Result<Json<ReactionResponse>> {
    if req.kind != "up" && req.kind != "down" {
        return Err(ApiError::BadRequest(format!(
            "invalid reaction kind '{}'",
            req.kind
        )));
    }

    // Visibility check: the message must sit in one of the caller's
    // conversations.
    message::get_owned(state.db.pool(), message_id, &user_id).await?;

    let counts = reaction::toggle(state.db.pool(), message_id, &user_id, &req.kind).await?;
    let my_reaction = reaction::for_user(state.db.pool(), message_id, &user_id).await?;

    Ok(Json(ReactionResponse {
        up: counts.up,
        down: counts.down,
        my_reaction,
    }))
}
