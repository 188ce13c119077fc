//! # Mermaid Relay
//!
//! Renders Mermaid diagram text to PNG through public rendering services.
//! Services are tried in a fixed order (mermaid.ink high resolution,
//! mermaid.ink standard, Kroki, QuickChart); the first valid image wins and is
//! cached for the life of the process under the exact submitted text.

pub mod backends;
pub mod cache;
pub mod config;
pub mod encoding;
pub mod errors;
pub mod render;
pub mod session;
pub mod theme;
pub mod types;

pub use backends::{Backend, BackendChain, BackendRequest, Transport, TransportResponse};
pub use cache::RenderCache;
pub use config::RenderConfig;
pub use errors::{RenderError, Result};
pub use render::{RenderEvent, Renderer};
pub use session::RenderSession;
pub use theme::{format_theme_config, Rgb, ThemeConfig};
pub use types::{DiagramRequest, RenderKey, RenderedImage};
