//! mermaid.ink image service
//!
//! The diagram travels base64-encoded in the URL path; width, height and
//! scale are query parameters.

use std::sync::Arc;

use async_trait::async_trait;

use super::{fetch_image, Backend, BackendRequest, ResponsePolicy, Transport};
use crate::encoding::direct_base64;
use crate::errors::Result;
use crate::types::{RenderKey, RenderedImage};

const DEFAULT_MERMAID_INK_URL: &str = "https://mermaid.ink";

/// Target size requested from mermaid.ink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MermaidInkResolution {
    /// 2400x1800 at scale 3
    High,
    /// 1920x1440 at scale 2
    Standard,
}

impl MermaidInkResolution {
    /// (width, height, scale)
    pub fn dimensions(&self) -> (u32, u32, u32) {
        match self {
            MermaidInkResolution::High => (2400, 1800, 3),
            MermaidInkResolution::Standard => (1920, 1440, 2),
        }
    }

    fn backend_name(&self) -> &'static str {
        match self {
            MermaidInkResolution::High => "mermaid.ink (high-res)",
            MermaidInkResolution::Standard => "mermaid.ink",
        }
    }
}

pub struct MermaidInkBackend {
    resolution: MermaidInkResolution,
    base_url: String,
    transport: Arc<dyn Transport>,
    policy: ResponsePolicy,
}

impl MermaidInkBackend {
    pub fn new(
        resolution: MermaidInkResolution,
        transport: Arc<dyn Transport>,
        policy: ResponsePolicy,
    ) -> Self {
        Self {
            resolution,
            base_url: DEFAULT_MERMAID_INK_URL.to_string(),
            transport,
            policy,
        }
    }

    /// Point at another host (self-hosted mermaid.ink, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn resolution(&self) -> MermaidInkResolution {
        self.resolution
    }
}

#[async_trait]
impl Backend for MermaidInkBackend {
    fn name(&self) -> &str {
        self.resolution.backend_name()
    }

    fn encode(&self, key: &RenderKey) -> Result<BackendRequest> {
        let (width, height, scale) = self.resolution.dimensions();
        let url = format!(
            "{}/img/{}?type=png&theme=base&width={}&height={}&scale={}",
            self.base_url.trim_end_matches('/'),
            direct_base64(key),
            width,
            height,
            scale
        );
        Ok(BackendRequest::Get { url })
    }

    async fn invoke(&self, request: BackendRequest) -> Result<RenderedImage> {
        fetch_image(self.name(), self.transport.as_ref(), &self.policy, &request).await
    }
}
