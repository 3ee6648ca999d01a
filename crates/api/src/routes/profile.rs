//! Profile, model catalog and credit routes.

use axum::extract::{Path, State};
use axum::Json;
use database::{catalog, profile, BackendChoice, Profile};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::UserId;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Partial profile update. Absent fields keep their current value.
#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub backend_choice: Option<String>,
    pub character_name: Option<String>,
    pub nebius_model: Option<String>,
    pub ollama_model: Option<String>,
    pub openai_model: Option<String>,
}

/// Credit balance response.
#[derive(Serialize)]
pub struct CreditsResponse {
    pub balance: i64,
}

/// Model catalog listing for one family.
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub family: String,
    pub models: Vec<String>,
}

/// Fetch the caller's profile, creating it with defaults on first use.
pub async fn get_profile(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<Profile>> {
    let profile = profile::get_or_create(state.db.pool(), &user_id).await?;
    Ok(Json(profile))
}

/// Update backend choice and model selections.
///
/// Model names are validated against the catalog, which the external
/// sync job keeps current.
pub async fn update_profile(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>> {
    let mut current = profile::get_or_create(state.db.pool(), &user_id).await?;

    if let Some(choice) = req.backend_choice {
        if BackendChoice::parse(&choice).is_none() {
            return Err(ApiError::BadRequest(format!(
                "unknown backend choice '{choice}'"
            )));
        }
        current.backend_choice = choice;
    }

    if let Some(name) = req.character_name {
        validate_model(&state, BackendChoice::Character, &name).await?;
        current.character_name = Some(name);
    }
    if let Some(name) = req.nebius_model {
        validate_model(&state, BackendChoice::Nebius, &name).await?;
        current.nebius_model = Some(name);
    }
    if let Some(name) = req.ollama_model {
        validate_model(&state, BackendChoice::Ollama, &name).await?;
        current.ollama_model = Some(name);
    }
    if let Some(name) = req.openai_model {
        validate_model(&state, BackendChoice::OpenAi, &name).await?;
        current.openai_model = Some(name);
    }

    profile::update(state.db.pool(), &current).await?;
    info!(user_id = %user_id, choice = %current.backend_choice, "profile updated");

    let updated = profile::get_or_create(state.db.pool(), &user_id).await?;
    Ok(Json(updated))
}

/// List catalog models for one provider family.
pub async fn models(
    State(state): State<AppState>,
    UserId(_): UserId,
    Path(family): Path<String>,
) -> Result<Json<ModelsResponse>> {
    let choice = BackendChoice::parse(&family)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown backend family '{family}'")))?;

    let models = catalog::list_models(state.db.pool(), choice).await?;
    Ok(Json(ModelsResponse { family, models }))
}

/// Current credit balance, creating the row with the starting grant on
/// first access.
pub async fn credits_balance(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<CreditsResponse>> {
    let balance = state.orchestrator.balance(&user_id).await?;
    Ok(Json(CreditsResponse { balance }))
}

async fn validate_model(state: &AppState, family: BackendChoice, name: &str) -> Result<()> {
    if !catalog::model_exists(state.db.pool(), family, name).await? {
        return Err(ApiError::BadRequest(format!(
            "unknown {} model '{}'",
            family.as_str(),
            name
        )));
    }
    Ok(())
}
