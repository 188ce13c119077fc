//! Render orchestration: cache lookup, then the backend chain in priority order

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::events::{EventSink, RenderEvent};
use crate::backends::{Backend, BackendChain, HttpTransport};
use crate::cache::RenderCache;
use crate::config::RenderConfig;
use crate::errors::{AttemptFailure, RenderError, Result};
use crate::types::{DiagramRequest, RenderKey, RenderedImage};

/// Where a render call currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    CacheCheck,
    /// Trying the backend at this position
    Attempting(usize),
    /// The backend at this position produced a valid image
    Success(usize),
    ExhaustedFailure,
    Done,
}

impl RenderState {
    /// State after the cache lookup
    pub fn after_cache(hit: bool) -> Self {
        if hit {
            RenderState::Done
        } else {
            RenderState::Attempting(0)
        }
    }

    /// State after the backend at `index` failed, with `total` backends
    pub fn after_failure(index: usize, total: usize) -> Self {
        if index + 1 < total {
            RenderState::Attempting(index + 1)
        } else {
            RenderState::ExhaustedFailure
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RenderState::Done | RenderState::ExhaustedFailure)
    }
}

/// Where an image came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderSource {
    Cache,
    Backend { index: usize, name: String },
}

/// Image plus provenance
#[derive(Debug, Clone)]
pub struct Rendered {
    pub image: RenderedImage,
    pub source: RenderSource,
}

/// Turns diagram requests into images.
///
/// Cloning is cheap; clones share the backend chain and the cache.
#[derive(Debug, Clone)]
pub struct Renderer {
    chain: BackendChain,
    cache: Arc<RenderCache>,
    timeout: Duration,
}

impl Renderer {
    /// Standard four-service chain over HTTP with a fresh cache
    pub fn new(config: &RenderConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(config)?);
        let chain = BackendChain::standard(transport, config);
        Ok(Self::with_chain(
            chain,
            Arc::new(RenderCache::new()),
            config.timeout(),
        ))
    }

    pub fn with_chain(chain: BackendChain, cache: Arc<RenderCache>, timeout: Duration) -> Self {
        Self {
            chain,
            cache,
            timeout,
        }
    }

    pub fn cache(&self) -> &Arc<RenderCache> {
        &self.cache
    }

    pub fn chain(&self) -> &BackendChain {
        &self.chain
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Render a diagram, returning the first valid image
    pub async fn render(&self, request: &DiagramRequest) -> Result<RenderedImage> {
        Ok(self.run(request.render_key(), &EventSink::default()).await?.image)
    }

    /// Like [`Renderer::render`] but reports which backend (or the cache) answered
    pub async fn render_detailed(&self, request: &DiagramRequest) -> Result<Rendered> {
        self.run(request.render_key(), &EventSink::default()).await
    }

    /// Render while publishing progress on `events`
    pub async fn render_with_events(
        &self,
        request: &DiagramRequest,
        events: UnboundedSender<RenderEvent>,
    ) -> Result<Rendered> {
        self.run(request.render_key(), &EventSink::new(events)).await
    }

    /// Run the render on a background task. Dropping the handle does not
    /// cancel in-flight requests; the result is simply discarded.
    pub fn spawn(&self, request: DiagramRequest) -> JoinHandle<Result<RenderedImage>> {
        let renderer = self.clone();
        tokio::spawn(async move { renderer.render(&request).await })
    }

    /// Render several independent diagrams concurrently
    pub async fn render_all(&self, requests: &[DiagramRequest]) -> Vec<Result<RenderedImage>> {
        join_all(requests.iter().map(|request| self.render(request))).await
    }

    async fn run(&self, key: RenderKey, events: &EventSink) -> Result<Rendered> {
        if self.chain.is_empty() {
            return Err(RenderError::NoBackends);
        }

        let mut failures: Vec<AttemptFailure> = Vec::new();
        let mut rendered: Option<Rendered> = None;
        let mut state = RenderState::Idle;

        loop {
            state = match state {
                RenderState::Idle => RenderState::CacheCheck,

                RenderState::CacheCheck => {
                    let cached = self.cache.get(&key);
                    let hit = cached.is_some();
                    if let Some(image) = cached {
                        debug!("Cache hit ({} bytes)", image.len());
                        events.emit(RenderEvent::CacheHit);
                        rendered = Some(Rendered {
                            image,
                            source: RenderSource::Cache,
                        });
                    }
                    RenderState::after_cache(hit)
                }

                RenderState::Attempting(index) => {
                    let Some(backend) = self.chain.get(index) else {
                        return Err(RenderError::NoBackends);
                    };
                    let name = backend.name().to_string();
                    debug!("Trying rendering service {} ({})", index + 1, name);
                    events.emit(RenderEvent::AttemptStarted {
                        index,
                        backend: name.clone(),
                    });

                    match self.attempt(backend.as_ref(), &key).await {
                        Ok(image) => {
                            rendered = Some(Rendered {
                                image,
                                source: RenderSource::Backend { index, name },
                            });
                            RenderState::Success(index)
                        }
                        Err(err) => {
                            warn!("Renderer {} ({}) failed: {}", index + 1, name, err);
                            events.emit(RenderEvent::AttemptFailed {
                                index,
                                backend: name.clone(),
                                error: err.to_string(),
                            });
                            failures.push(AttemptFailure {
                                index,
                                backend: name,
                                error: err,
                            });
                            RenderState::after_failure(index, self.chain.len())
                        }
                    }
                }

                RenderState::Success(index) => {
                    if let Some(result) = &rendered {
                        let name = self.chain.get(index).map(|b| b.name()).unwrap_or_default();
                        info!("Rendered by {} ({} bytes)", name, result.image.len());
                        events.emit(RenderEvent::Succeeded {
                            index,
                            backend: name.to_string(),
                            bytes: result.image.len(),
                        });
                        self.cache.put(key.clone(), result.image.clone());
                    }
                    RenderState::Done
                }

                RenderState::ExhaustedFailure => {
                    error!("All {} rendering services failed", failures.len());
                    events.emit(RenderEvent::Exhausted {
                        attempts: failures.len(),
                    });
                    return Err(exhausted(failures));
                }

                RenderState::Done => return rendered.ok_or(RenderError::NoBackends),
            };
        }
    }

    /// One encode + invoke against a single backend, bounded by the timeout
    async fn attempt(&self, backend: &dyn Backend, key: &RenderKey) -> Result<RenderedImage> {
        let request = backend.encode(key)?;

        match tokio::time::timeout(self.timeout, backend.invoke(request)).await {
            Ok(result) => result,
            Err(_) => Err(RenderError::BackendTimeout {
                name: Arc::new(backend.name().to_string()),
                timeout: self.timeout,
            }),
        }
    }
}

fn exhausted(failures: Vec<AttemptFailure>) -> RenderError {
    let last_cause = failures
        .last()
        .map(|failure| failure.error.clone())
        .unwrap_or(RenderError::NoBackends);

    RenderError::ExhaustedError {
        last_cause: Box::new(last_cause),
        attempts: Arc::new(failures),
    }
}
