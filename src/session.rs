//! Caller-owned diagram insertion preferences
//!
//! Holds what the editing UI remembers between dialogs: whether custom colors
//! are on and which palette was used last. The renderer keeps no such state.

use crate::errors::{RenderError, Result};
use crate::theme::ThemeConfig;
use crate::types::DiagramRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSession {
    use_custom_colors: bool,
    palette: ThemeConfig,
    palette_name: String,
}

impl Default for RenderSession {
    fn default() -> Self {
        let name = crate::theme::palette::CORPORATE_BLUE;
        Self {
            use_custom_colors: true,
            palette: ThemeConfig::preset(name).unwrap_or_default(),
            palette_name: name.to_string(),
        }
    }
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn use_custom_colors(&self) -> bool {
        self.use_custom_colors
    }

    pub fn set_use_custom_colors(&mut self, enabled: bool) {
        self.use_custom_colors = enabled;
    }

    pub fn palette(&self) -> &ThemeConfig {
        &self.palette
    }

    pub fn palette_name(&self) -> &str {
        &self.palette_name
    }

    /// Remember the palette chosen in the color dialog
    pub fn remember_palette(&mut self, name: impl Into<String>, palette: ThemeConfig) {
        self.palette_name = name.into();
        self.palette = palette;
    }

    /// Trim the entered code and build the request; blank input is rejected
    pub fn prepare(&self, code: &str) -> Result<DiagramRequest> {
        let code = code.trim();
        if code.is_empty() {
            return Err(RenderError::EmptyDiagram);
        }

        let request = DiagramRequest::new(code);
        Ok(if self.use_custom_colors {
            request.with_theme(self.palette)
        } else {
            request
        })
    }
}
