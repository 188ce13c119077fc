//! Diagram rendering pipeline
//!
//! [`Renderer`] checks the [`RenderCache`](crate::cache::RenderCache) and, on a
//! miss, walks the backend chain in its fixed order. The first valid image is
//! cached and returned; when every backend fails the caller gets
//! [`RenderError::ExhaustedError`](crate::errors::RenderError::ExhaustedError).

pub mod events;
pub mod orchestrator;

pub use events::RenderEvent;
pub use orchestrator::{RenderSource, RenderState, Rendered, Renderer};
