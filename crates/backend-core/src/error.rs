//! Error types for backend operations.

use thiserror::Error;

/// Errors that can occur while generating a completion.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend is not usable with the caller's current profile
    /// (e.g. no model or character selected).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never reached the provider.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider answered 2xx but the body could not be used.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    /// Render the error the way it is shown inside a conversation.
    ///
    /// Failed turns persist their error text as the assistant message, so
    /// the wording is user-facing.
    pub fn user_message(&self) -> String {
        format!("Error: {self}")
    }
}
