//! Remote rendering backends
//!
//! Each backend knows its endpoint, how to encode a [`RenderKey`] for it and
//! how to judge whether a response is an image. The standard chain, in
//! priority order:
//! - mermaid.ink, high resolution
//! - mermaid.ink, standard resolution
//! - Kroki
//! - QuickChart

mod kroki;
mod mermaid_ink;
mod quickchart;
pub mod transport;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::RenderConfig;
use crate::errors::{RenderError, Result};
use crate::types::{RenderKey, RenderedImage};

pub use kroki::KrokiBackend;
pub use mermaid_ink::{MermaidInkBackend, MermaidInkResolution};
pub use quickchart::QuickChartBackend;
pub use transport::{BackendRequest, HttpTransport, Transport, TransportError, TransportResponse};

/// Capability every rendering service implements
#[async_trait]
pub trait Backend: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Build the wire request for a diagram
    fn encode(&self, key: &RenderKey) -> Result<BackendRequest>;

    /// Perform the request once and validate the result
    async fn invoke(&self, request: BackendRequest) -> Result<RenderedImage>;
}

/// How a response body is judged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponsePolicy {
    pub min_image_bytes: usize,
    pub strict_png: bool,
}

impl Default for ResponsePolicy {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for ResponsePolicy {
    fn from(config: &RenderConfig) -> Self {
        Self {
            min_image_bytes: config.min_image_bytes,
            strict_png: config.strict_png,
        }
    }
}

impl ResponsePolicy {
    /// Turn a raw response into an image or a backend failure
    pub fn validate(&self, name: &str, response: TransportResponse) -> Result<RenderedImage> {
        if !response.is_success() {
            return Err(RenderError::backend(name, format!("HTTP {}", response.status)));
        }

        if response.body.len() < self.min_image_bytes {
            return Err(RenderError::backend(
                name,
                format!(
                    "Invalid image data received ({} bytes, need at least {})",
                    response.body.len(),
                    self.min_image_bytes
                ),
            ));
        }

        let image = RenderedImage::from(response.body);
        if self.strict_png && !image.is_png() {
            return Err(RenderError::backend(
                name,
                format!(
                    "Response is not a PNG image (content-type: {})",
                    response.content_type.as_deref().unwrap_or("unknown")
                ),
            ));
        }

        Ok(image)
    }
}

/// Send `request` and validate the answer; shared by all backends
pub(crate) async fn fetch_image(
    name: &str,
    transport: &dyn Transport,
    policy: &ResponsePolicy,
    request: &BackendRequest,
) -> Result<RenderedImage> {
    let response = transport.send(request).await.map_err(|e| match e {
        TransportError::Timeout(timeout) => RenderError::BackendTimeout {
            name: Arc::new(name.to_string()),
            timeout,
        },
        other => RenderError::backend(name, other),
    })?;

    debug!(
        "{} answered {} with {} bytes",
        name,
        response.status,
        response.body.len()
    );

    policy.validate(name, response)
}

/// Fixed, ordered list of backends. Position is priority; it never changes
/// after construction.
#[derive(Clone)]
pub struct BackendChain {
    backends: Arc<[Arc<dyn Backend>]>,
}

impl BackendChain {
    pub fn new(backends: Vec<Arc<dyn Backend>>) -> Self {
        Self {
            backends: backends.into(),
        }
    }

    /// The four public services in their fixed priority order
    pub fn standard(transport: Arc<dyn Transport>, config: &RenderConfig) -> Self {
        let policy = ResponsePolicy::from(config);
        Self::new(vec![
            Arc::new(MermaidInkBackend::new(
                MermaidInkResolution::High,
                Arc::clone(&transport),
                policy,
            )),
            Arc::new(MermaidInkBackend::new(
                MermaidInkResolution::Standard,
                Arc::clone(&transport),
                policy,
            )),
            Arc::new(KrokiBackend::new(Arc::clone(&transport), policy)),
            Arc::new(QuickChartBackend::new(transport, policy)),
        ])
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<dyn Backend>> {
        self.backends.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Backend>> {
        self.backends.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }
}

impl std::fmt::Debug for BackendChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
