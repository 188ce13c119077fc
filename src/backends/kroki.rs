//! Kroki diagram service
//!
//! No size control; the diagram is deflated and sent URL-safe base64 encoded.

use std::sync::Arc;

use async_trait::async_trait;

use super::{fetch_image, Backend, BackendRequest, ResponsePolicy, Transport};
use crate::encoding::compressed_base64url;
use crate::errors::{RenderError, Result};
use crate::types::{RenderKey, RenderedImage};

const DEFAULT_KROKI_URL: &str = "https://kroki.io";
const KROKI_NAME: &str = "kroki";

pub struct KrokiBackend {
    base_url: String,
    transport: Arc<dyn Transport>,
    policy: ResponsePolicy,
}

impl KrokiBackend {
    pub fn new(transport: Arc<dyn Transport>, policy: ResponsePolicy) -> Self {
        Self {
            base_url: DEFAULT_KROKI_URL.to_string(),
            transport,
            policy,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Backend for KrokiBackend {
    fn name(&self) -> &str {
        KROKI_NAME
    }

    fn encode(&self, key: &RenderKey) -> Result<BackendRequest> {
        let encoded =
            compressed_base64url(key).map_err(|e| RenderError::encoding(KROKI_NAME, e))?;
        Ok(BackendRequest::Get {
            url: format!(
                "{}/mermaid/png/{}",
                self.base_url.trim_end_matches('/'),
                encoded
            ),
        })
    }

    async fn invoke(&self, request: BackendRequest) -> Result<RenderedImage> {
        fetch_image(KROKI_NAME, self.transport.as_ref(), &self.policy, &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_support::RecordingTransport;

    #[test]
    fn test_url_shape() {
        let backend = KrokiBackend::new(
            Arc::new(RecordingTransport::ok(200, vec![])),
            ResponsePolicy::default(),
        );
        let key = RenderKey::from("graph TD\n  A --> B");
        let request = backend.encode(&key).unwrap();
        let expected = format!(
            "https://kroki.io/mermaid/png/{}",
            compressed_base64url(&key).unwrap()
        );
        assert_eq!(request, BackendRequest::Get { url: expected });

        let local = KrokiBackend::new(
            Arc::new(RecordingTransport::ok(200, vec![])),
            ResponsePolicy::default(),
        )
        .with_base_url("http://localhost:8000/");
        assert!(local
            .encode(&key)
            .unwrap()
            .url()
            .starts_with("http://localhost:8000/mermaid/png/"));
    }

    #[tokio::test]
    async fn test_small_body_is_rejected() {
        let backend = KrokiBackend::new(
            Arc::new(RecordingTransport::ok(200, vec![0u8; 99])),
            ResponsePolicy::default(),
        );
        let request = backend.encode(&RenderKey::from("graph TD")).unwrap();
        let err = backend.invoke(request).await.unwrap_err();
        assert_eq!(err.backend_name(), Some("kroki"));
        assert!(err.to_string().contains("99 bytes"));
    }
}
