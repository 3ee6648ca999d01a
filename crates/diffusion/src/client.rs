//! DiffusionClient implementation.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::DiffusionConfig;
use crate::error::DiffusionError;

/// txt2img request body.
#[derive(Debug, Clone, Serialize)]
struct Txt2ImgRequest {
    prompt: String,
    steps: u32,
    cfg_scale: u32,
    width: u32,
    height: u32,
    send_images: bool,
    save_images: bool,
}

/// txt2img response body.
#[derive(Debug, Clone, Deserialize)]
struct Txt2ImgResponse {
    #[serde(default)]
    images: Vec<String>,
}

/// Client for a stable-diffusion-webui txt2img endpoint.
pub struct DiffusionClient {
    client: Client,
    config: DiffusionConfig,
}

impl DiffusionClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DiffusionConfig) -> Result<Self, DiffusionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DiffusionError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!("DiffusionClient initialized for {}", config.api_url);

        Ok(Self { client, config })
    }

    /// Create a client from environment variables.
    ///
    /// See [`DiffusionConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, DiffusionError> {
        Self::new(DiffusionConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &DiffusionConfig {
        &self.config
    }

    /// Generate a single image from a text prompt.
    ///
    /// Blocks until the service finishes sampling. One attempt, no retry.
    pub async fn generate(&self, prompt: &str) -> Result<Vec<u8>, DiffusionError> {
        let request = Txt2ImgRequest {
            prompt: prompt.to_string(),
            steps: self.config.steps,
            cfg_scale: self.config.cfg_scale,
            width: self.config.width,
            height: self.config.height,
            send_images: true,
            save_images: false,
        };

        debug!("Sending txt2img request: {:?}", request);

        let response = self
            .client
            .post(&self.config.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DiffusionError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DiffusionError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body: Txt2ImgResponse = response.json().await.map_err(|e| {
            DiffusionError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        let Some(image_data) = body.images.first() else {
            return Err(DiffusionError::InvalidResponse(
                "empty image set".to_string(),
            ));
        };

        decode_image_payload(image_data)
    }
}

/// Decode a base64 image payload, tolerating a `data:...,` URL prefix.
fn decode_image_payload(data: &str) -> Result<Vec<u8>, DiffusionError> {
    let base64_data = match data.split_once(',') {
        Some((_, tail)) => tail,
        None => data,
    };

    BASE64
        .decode(base64_data)
        .map_err(|e| DiffusionError::InvalidResponse(format!("Failed to decode image: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_base64() {
        let encoded = BASE64.encode(b"png-bytes");
        assert_eq!(decode_image_payload(&encoded).unwrap(), b"png-bytes");
    }

    #[test]
    fn test_decode_data_url_prefix() {
        let encoded = format!("data:image/png;base64,{}", BASE64.encode(b"png-bytes"));
        assert_eq!(decode_image_payload(&encoded).unwrap(), b"png-bytes");
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = decode_image_payload("!!not base64!!");
        assert!(matches!(result, Err(DiffusionError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_generate_network_failure() {
        let config = DiffusionConfig::builder("http://127.0.0.1:1/sdapi/v1/txt2img")
            .timeout(std::time::Duration::from_secs(2))
            .build();
        let client = DiffusionClient::new(config).unwrap();

        let result = client.generate("a lighthouse at dawn").await;
        assert!(matches!(result, Err(DiffusionError::Network(_))));
    }
}
