//! HTTP transport used by every backend
//!
//! Backends build a [`BackendRequest`] and hand it to a [`Transport`]; the
//! production implementation is [`HttpTransport`] on top of reqwest.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::RenderConfig;
use crate::errors::{RenderError, Result};

/// Wire-level request shape of a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendRequest {
    /// Diagram embedded in the URL
    Get { url: String },
    /// Diagram in a JSON body
    PostJson { url: String, body: String },
}

impl BackendRequest {
    pub fn url(&self) -> &str {
        match self {
            BackendRequest::Get { url } | BackendRequest::PostJson { url, .. } => url,
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            BackendRequest::Get { .. } => "GET",
            BackendRequest::PostJson { .. } => "POST",
        }
    }
}

/// What came back over the wire, before any validation
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport failures. Backends turn `Timeout` into `RenderError::BackendTimeout`
/// and everything else into `RenderError::BackendError`.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read response: {0}")]
    Body(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &BackendRequest) -> std::result::Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport, one connection pool shared by all backends
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new transport from the render configuration
    pub fn new(config: &RenderConfig) -> Result<Self> {
        config.validate()?;

        let user_agent = header::HeaderValue::from_str(&config.user_agent).map_err(|e| {
            RenderError::ConfigurationError(format!("Invalid user agent: {}", e).into())
        })?;
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, user_agent);

        let timeout = config.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                RenderError::ConfigurationError(format!("Failed to create HTTP client: {}", e).into())
            })?;

        info!(
            "HTTP transport initialized with {}s timeout",
            config.timeout_seconds
        );

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &BackendRequest) -> std::result::Result<TransportResponse, TransportError> {
        debug!("{} {}", request.method(), request.url());

        let builder = match request {
            BackendRequest::Get { url } => self.client.get(url),
            BackendRequest::PostJson { url, body } => self
                .client
                .post(url)
                .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
                .body(body.clone()),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout)
            } else {
                TransportError::Request(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout)
            } else {
                TransportError::Body(e.to_string())
            }
        })?;

        Ok(TransportResponse {
            status,
            content_type,
            body,
        })
    }
}
