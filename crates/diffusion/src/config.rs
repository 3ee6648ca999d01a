//! Configuration for the diffusion client.

use std::env;
use std::time::Duration;

use crate::error::DiffusionError;

/// Default generation parameters.
pub const DEFAULT_STEPS: u32 = 20;
pub const DEFAULT_CFG_SCALE: u32 = 5;
pub const DEFAULT_WIDTH: u32 = 512;
pub const DEFAULT_HEIGHT: u32 = 512;

/// Default request timeout in seconds. Image generation is slow.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration for the diffusion client.
#[derive(Debug, Clone)]
pub struct DiffusionConfig {
    /// txt2img endpoint of the diffusion service.
    pub api_url: String,

    /// Number of sampling steps.
    pub steps: u32,

    /// Classifier-free guidance scale.
    pub cfg_scale: u32,

    /// Image width in pixels.
    pub width: u32,

    /// Image height in pixels.
    pub height: u32,

    /// Request timeout.
    pub timeout: Duration,
}

impl DiffusionConfig {
    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `STABLE_DIFFUSION_URL` - txt2img endpoint of the service
    ///
    /// Optional:
    /// - `STABLE_DIFFUSION_STEPS` - Sampling steps (default: 20)
    /// - `STABLE_DIFFUSION_CFG_SCALE` - Guidance scale (default: 5)
    /// - `STABLE_DIFFUSION_WIDTH` - Image width (default: 512)
    /// - `STABLE_DIFFUSION_HEIGHT` - Image height (default: 512)
    /// - `STABLE_DIFFUSION_TIMEOUT_SECS` - Request timeout (default: 300)
    pub fn from_env() -> Result<Self, DiffusionError> {
        let api_url = env::var("STABLE_DIFFUSION_URL").map_err(|_| {
            DiffusionError::Configuration("STABLE_DIFFUSION_URL not set".to_string())
        })?;

        let steps = env::var("STABLE_DIFFUSION_STEPS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_STEPS);

        let cfg_scale = env::var("STABLE_DIFFUSION_CFG_SCALE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CFG_SCALE);

        let width = env::var("STABLE_DIFFUSION_WIDTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_WIDTH);

        let height = env::var("STABLE_DIFFUSION_HEIGHT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_HEIGHT);

        let timeout_secs = env::var("STABLE_DIFFUSION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_url,
            steps,
            cfg_scale,
            width,
            height,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Create a new config builder.
    pub fn builder(api_url: impl Into<String>) -> DiffusionConfigBuilder {
        DiffusionConfigBuilder {
            config: DiffusionConfig {
                api_url: api_url.into(),
                steps: DEFAULT_STEPS,
                cfg_scale: DEFAULT_CFG_SCALE,
                width: DEFAULT_WIDTH,
                height: DEFAULT_HEIGHT,
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            },
        }
    }
}

/// Builder for DiffusionConfig.
#[derive(Debug)]
pub struct DiffusionConfigBuilder {
    config: DiffusionConfig,
}

impl DiffusionConfigBuilder {
    /// Set the sampling steps.
    pub fn steps(mut self, steps: u32) -> Self {
        self.config.steps = steps;
        self
    }

    /// Set the guidance scale.
    pub fn cfg_scale(mut self, scale: u32) -> Self {
        self.config.cfg_scale = scale;
        self
    }

    /// Set the image dimensions.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> DiffusionConfig {
        self.config
    }
}
