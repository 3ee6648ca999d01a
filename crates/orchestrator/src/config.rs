//! Orchestrator configuration.

use std::env;
use std::path::PathBuf;

/// Credits granted to a user the first time their balance row is touched.
pub const DEFAULT_STARTING_CREDITS: i64 = 500;

/// Credits debited for a successful text turn.
pub const DEFAULT_TEXT_TURN_COST: i64 = 1;

/// Credits debited for a successful image turn.
pub const DEFAULT_IMAGE_TURN_COST: i64 = 5;

/// Model used for conversation summaries.
pub const DEFAULT_SUMMARY_MODEL: &str = "gpt-4o-mini";

/// Directory that generated images are written under.
pub const DEFAULT_MEDIA_ROOT: &str = "media";

/// Tunable costs and paths for the orchestrator.
///
/// # Environment Variables
///
/// - `STARTING_CREDITS`: Balance granted to new users (default: 500)
/// - `TEXT_TURN_COST`: Credits per text turn (default: 1)
/// - `IMAGE_TURN_COST`: Credits per image turn (default: 5)
/// - `SUMMARY_MODEL`: Model for conversation summaries (default: gpt-4o-mini)
/// - `MEDIA_ROOT`: Directory for generated images (default: media)
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Balance granted when a user's credit row is first created.
    pub starting_credits: i64,
    /// Cost of one text turn.
    pub text_turn_cost: i64,
    /// Cost of one image turn.
    pub image_turn_cost: i64,
    /// Model name passed to the summarizer.
    pub summary_model: String,
    /// Root directory for generated media.
    pub media_root: PathBuf,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            starting_credits: DEFAULT_STARTING_CREDITS,
            text_turn_cost: DEFAULT_TEXT_TURN_COST,
            image_turn_cost: DEFAULT_IMAGE_TURN_COST,
            summary_model: DEFAULT_SUMMARY_MODEL.to_string(),
            media_root: PathBuf::from(DEFAULT_MEDIA_ROOT),
        }
    }
}

impl OrchestratorConfig {
    /// Load configuration from environment variables, falling back to
    /// the defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            starting_credits: env_i64("STARTING_CREDITS", defaults.starting_credits),
            text_turn_cost: env_i64("TEXT_TURN_COST", defaults.text_turn_cost),
            image_turn_cost: env_i64("IMAGE_TURN_COST", defaults.image_turn_cost),
            summary_model: env::var("SUMMARY_MODEL").unwrap_or(defaults.summary_model),
            media_root: env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.media_root),
        }
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.starting_credits, 500);
        assert_eq!(config.text_turn_cost, 1);
        assert_eq!(config.image_turn_cost, 5);
        assert_eq!(config.summary_model, "gpt-4o-mini");
        assert_eq!(config.media_root, PathBuf::from("media"));
    }
}
