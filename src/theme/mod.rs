//! Theme configuration for rendered diagrams
//!
//! A [`ThemeConfig`] holds ten role colors; [`format_theme_config`] turns it into
//! the Mermaid init directive that is prepended to the diagram text.

pub mod color;
pub mod format;
pub mod palette;

pub use color::{lighten_channel, Rgb};
pub use format::{apply_theme, format_theme_config};
pub use palette::{ColorRole, ThemeConfig, PRESET_NAMES};
