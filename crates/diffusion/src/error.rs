//! Error types for image generation.

use thiserror::Error;

/// Errors that can occur while generating an image.
#[derive(Debug, Error)]
pub enum DiffusionError {
    /// Client construction or other local configuration failure.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never reached the service.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The service answered 2xx but returned no usable image.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
