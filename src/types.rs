use std::fmt;

use bytes::Bytes;

use crate::theme::{apply_theme, ThemeConfig};

/// PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// A diagram to render: the raw description plus an optional palette.
///
/// Immutable once built; `text` is never rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramRequest {
    text: String,
    theme: Option<ThemeConfig>,
}

impl DiagramRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            theme: None,
        }
    }

    pub fn with_theme(mut self, theme: ThemeConfig) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn theme(&self) -> Option<&ThemeConfig> {
        self.theme.as_ref()
    }

    /// The exact string that gets submitted to a backend
    pub fn render_key(&self) -> RenderKey {
        match &self.theme {
            Some(theme) => RenderKey(apply_theme(theme, &self.text)),
            None => RenderKey(self.text.clone()),
        }
    }
}

/// Fully formatted diagram text. Two requests are the same diagram only if
/// their keys are byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderKey(String);

impl RenderKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for RenderKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RenderKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RenderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable PNG bytes returned by a backend. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderedImage(Bytes);

impl RenderedImage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the payload starts with the PNG signature
    pub fn is_png(&self) -> bool {
        self.0.starts_with(&PNG_SIGNATURE)
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl From<Bytes> for RenderedImage {
    fn from(value: Bytes) -> Self {
        Self(value)
    }
}

impl From<Vec<u8>> for RenderedImage {
    fn from(value: Vec<u8>) -> Self {
        Self(Bytes::from(value))
    }
}

impl AsRef<[u8]> for RenderedImage {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::format_theme_config;

    #[test]
    fn test_render_key_without_theme_is_text() {
        let text = "graph TD\n  A[Start] --> B{Decision}";
        assert_eq!(DiagramRequest::new(text).render_key().as_str(), text);
    }

    #[test]
    fn test_render_key_with_theme_prefix() {
        let theme = ThemeConfig::default();
        let request = DiagramRequest::new("graph LR; A-->B").with_theme(theme);
        let key = request.render_key();
        let block = format_theme_config(&theme);

        assert!(key.as_str().starts_with(&block));
        assert_eq!(&key.as_str()[block.len()..], "\ngraph LR; A-->B");
        assert_eq!(request.text(), "graph LR; A-->B");
    }

    #[test]
    fn test_png_detection() {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(&[0u8; 4]);
        assert!(RenderedImage::from(data).is_png());
        assert!(!RenderedImage::from(b"<html>".to_vec()).is_png());
    }
}
