//! QuickChart rendering service, the last resort: POST with a JSON body

use std::sync::Arc;

use async_trait::async_trait;

use super::{fetch_image, Backend, BackendRequest, ResponsePolicy, Transport};
use crate::encoding::json_chart_body;
use crate::errors::{RenderError, Result};
use crate::types::{RenderKey, RenderedImage};

const DEFAULT_QUICKCHART_URL: &str = "https://quickchart.io";
const QUICKCHART_NAME: &str = "quickchart";

pub struct QuickChartBackend {
    base_url: String,
    transport: Arc<dyn Transport>,
    policy: ResponsePolicy,
}

impl QuickChartBackend {
    pub fn new(transport: Arc<dyn Transport>, policy: ResponsePolicy) -> Self {
        Self {
            base_url: DEFAULT_QUICKCHART_URL.to_string(),
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
impl Backend for QuickChartBackend {
    fn name(&self) -> &str {
        QUICKCHART_NAME
    }

    fn encode(&self, key: &RenderKey) -> Result<BackendRequest> {
        let body = json_chart_body(key).map_err(|e| RenderError::encoding(QUICKCHART_NAME, e))?;
        Ok(BackendRequest::PostJson {
            url: format!("{}/chart", self.base_url.trim_end_matches('/')),
            body,
        })
    }

    async fn invoke(&self, request: BackendRequest) -> Result<RenderedImage> {
        fetch_image(QUICKCHART_NAME, self.transport.as_ref(), &self.policy, &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_support::RecordingTransport;

    #[test]
    fn test_post_request_shape() {
        let backend = QuickChartBackend::new(
            Arc::new(RecordingTransport::ok(200, vec![])),
            ResponsePolicy::default(),
        );
        let request = backend.encode(&RenderKey::from("A --> \"B\"")).unwrap();
        match request {
            BackendRequest::PostJson { url, body } => {
                assert_eq!(url, "https://quickchart.io/chart");
                let value: serde_json::Value = serde_json::from_str(&body).unwrap();
                assert_eq!(value["chart"], "A --> \"B\"");
                assert_eq!(value["width"], 1920);
                assert_eq!(value["height"], 1440);
            }
            other => panic!("expected POST, got {other:?}"),
        }

        let local = QuickChartBackend::new(
            Arc::new(RecordingTransport::ok(200, vec![])),
            ResponsePolicy::default(),
        )
        .with_base_url("http://localhost:3400");
        let request = local.encode(&RenderKey::from("x")).unwrap();
        assert_eq!(request.url(), "http://localhost:3400/chart");
    }

    #[tokio::test]
    async fn test_error_status_is_backend_error() {
        let backend = QuickChartBackend::new(
            Arc::new(RecordingTransport::ok(400, vec![0u8; 300])),
            ResponsePolicy::default(),
        );
        let request = backend.encode(&RenderKey::from("graph TD")).unwrap();
        let err = backend.invoke(request).await.unwrap_err();
        assert!(matches!(err, RenderError::BackendError { .. }));
        assert!(err.to_string().contains("HTTP 400"));
    }
}
