//! Image generation seam.

use backend_core::async_trait;
use diffusion::{DiffusionClient, DiffusionError};

/// Turns a prompt into encoded image bytes.
///
/// Implemented by [`DiffusionClient`] in production; tests substitute
/// fixed or failing generators.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, DiffusionError>;
}

#[async_trait]
impl ImageGenerator for DiffusionClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, DiffusionError> {
        DiffusionClient::generate(self, prompt).await
    }
}
