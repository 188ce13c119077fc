//! Configuration for the rendering pipeline

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{RenderError, Result};

/// Reference budget for one backend invocation
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Responses shorter than this cannot be a usable image
pub const DEFAULT_MIN_IMAGE_BYTES: usize = 100;

/// Rendering settings. Backend endpoints are compiled in and not part of this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Budget for a single backend invocation, in seconds
    pub timeout_seconds: u64,
    /// Bodies with fewer bytes are rejected regardless of status
    pub min_image_bytes: usize,
    /// Additionally require the PNG signature on every body
    pub strict_png: bool,
    /// User-Agent header sent to every service
    pub user_agent: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            min_image_bytes: DEFAULT_MIN_IMAGE_BYTES,
            strict_png: false,
            user_agent: format!("mermaid-relay/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RenderConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(RenderError::ConfigurationError(Arc::new(
                "Timeout must be greater than 0".to_string(),
            )));
        }

        if self.min_image_bytes == 0 {
            return Err(RenderError::ConfigurationError(Arc::new(
                "Minimum image size must be greater than 0".to_string(),
            )));
        }

        if self.user_agent.trim().is_empty() {
            return Err(RenderError::ConfigurationError(Arc::new(
                "User agent cannot be empty".to_string(),
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_strict_png(mut self, strict: bool) -> Self {
        self.strict_png = strict;
        self
    }
}
