//! Error types for turn orchestration.

use murmur_database::DatabaseError;
use thiserror::Error;

/// Errors that can occur while processing a turn.
///
/// Backend failures during a text turn are deliberately absent here: they
/// are persisted as assistant messages and reported inside a successful
/// [`TurnResponse`](crate::TurnResponse) rather than surfaced as errors.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The caller's balance cannot cover a text turn.
    #[error("You have no credits left. Please buy more credits to continue.")]
    InsufficientCredits,

    /// The caller's balance cannot cover an image turn.
    #[error("You need at least {required} credits to generate an image.")]
    InsufficientImageCredits { required: i64 },

    /// Request payload failed validation before any state changed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Regeneration was requested for a conversation whose latest
    /// message is not a user message.
    #[error("no user message to regenerate from")]
    NoUserMessage,

    /// The diffusion adapter failed or is not configured.
    #[error("image generation failed: {0}")]
    ImageGeneration(String),

    /// Writing a generated image to the media root failed.
    #[error("media store error: {0}")]
    Media(#[from] std::io::Error),

    /// Persistence failed. Wraps `NotFound` for missing or foreign rows.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}
