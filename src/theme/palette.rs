//! Color palettes: the ten color roles a theme block is built from

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::color::Rgb;
use crate::errors::{RenderError, Result};

/// Named color roles of a palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Primary,
    Secondary,
    Tertiary,
    Quaternary,
    PrimaryText,
    SecondaryText,
    Background,
    Border,
    Line,
    Accent,
}

impl ColorRole {
    pub const ALL: [ColorRole; 10] = [
        ColorRole::Primary,
        ColorRole::Secondary,
        ColorRole::Tertiary,
        ColorRole::Quaternary,
        ColorRole::PrimaryText,
        ColorRole::SecondaryText,
        ColorRole::Background,
        ColorRole::Border,
        ColorRole::Line,
        ColorRole::Accent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorRole::Primary => "primary",
            ColorRole::Secondary => "secondary",
            ColorRole::Tertiary => "tertiary",
            ColorRole::Quaternary => "quaternary",
            ColorRole::PrimaryText => "primary-text",
            ColorRole::SecondaryText => "secondary-text",
            ColorRole::Background => "background",
            ColorRole::Border => "border",
            ColorRole::Line => "line",
            ColorRole::Accent => "accent",
        }
    }
}

/// Flat mapping of the ten color roles to RGB values.
///
/// Owned by the caller; rendering only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ThemeConfig {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub tertiary: Rgb,
    pub quaternary: Rgb,
    pub primary_text: Rgb,
    pub secondary_text: Rgb,
    pub background: Rgb,
    pub border: Rgb,
    pub line: Rgb,
    pub accent: Rgb,
}

pub const CORPORATE_BLUE: &str = "Corporate Blue";
pub const VIBRANT: &str = "Vibrant";
pub const DARK_PROFESSIONAL: &str = "Dark Professional";

/// Built-in preset names, in display order
pub const PRESET_NAMES: [&str; 3] = [CORPORATE_BLUE, VIBRANT, DARK_PROFESSIONAL];

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary: Rgb::new(68, 114, 196),
            secondary: Rgb::new(237, 125, 49),
            tertiary: Rgb::new(165, 165, 165),
            quaternary: Rgb::new(255, 192, 0),
            primary_text: Rgb::BLACK,
            secondary_text: Rgb::new(68, 68, 68),
            background: Rgb::WHITE,
            border: Rgb::new(68, 114, 196),
            line: Rgb::BLACK,
            accent: Rgb::new(91, 155, 213),
        }
    }
}

impl ThemeConfig {
    /// Look up a built-in preset by name (case-insensitive)
    pub fn preset(name: &str) -> Option<Self> {
        let name = name.trim();
        let found = PRESET_NAMES
            .iter()
            .find(|preset| preset.eq_ignore_ascii_case(name))?;

        let palette = match *found {
            CORPORATE_BLUE => Self {
                primary: Rgb::new(68, 114, 196),
                secondary: Rgb::new(91, 155, 213),
                tertiary: Rgb::new(165, 165, 165),
                quaternary: Rgb::new(112, 173, 71),
                primary_text: Rgb::BLACK,
                secondary_text: Rgb::new(68, 68, 68),
                background: Rgb::WHITE,
                border: Rgb::new(68, 114, 196),
                line: Rgb::new(68, 68, 68),
                accent: Rgb::new(237, 125, 49),
            },
            VIBRANT => Self {
                primary: Rgb::new(255, 87, 51),
                secondary: Rgb::new(25, 181, 254),
                tertiary: Rgb::new(255, 206, 84),
                quaternary: Rgb::new(129, 199, 132),
                primary_text: Rgb::new(33, 33, 33),
                secondary_text: Rgb::new(117, 117, 117),
                background: Rgb::WHITE,
                border: Rgb::new(255, 87, 51),
                line: Rgb::new(66, 66, 66),
                accent: Rgb::new(156, 39, 176),
            },
            _ => Self {
                primary: Rgb::new(52, 73, 94),
                secondary: Rgb::new(149, 165, 166),
                tertiary: Rgb::new(52, 152, 219),
                quaternary: Rgb::new(39, 174, 96),
                primary_text: Rgb::WHITE,
                secondary_text: Rgb::new(189, 195, 199),
                background: Rgb::new(44, 62, 80),
                border: Rgb::new(149, 165, 166),
                line: Rgb::new(189, 195, 199),
                accent: Rgb::new(231, 76, 60),
            },
        };

        Some(palette)
    }

    /// Like [`ThemeConfig::preset`] but reports unknown names as an error
    pub fn require_preset(name: &str) -> Result<Self> {
        Self::preset(name).ok_or_else(|| RenderError::UnknownPalette(Arc::new(name.to_string())))
    }

    /// All built-in presets with their names
    pub fn presets() -> Vec<(&'static str, Self)> {
        PRESET_NAMES
            .iter()
            .filter_map(|name| Self::preset(name).map(|palette| (*name, palette)))
            .collect()
    }

    /// Color assigned to a role
    pub fn color(&self, role: ColorRole) -> Rgb {
        match role {
            ColorRole::Primary => self.primary,
            ColorRole::Secondary => self.secondary,
            ColorRole::Tertiary => self.tertiary,
            ColorRole::Quaternary => self.quaternary,
            ColorRole::PrimaryText => self.primary_text,
            ColorRole::SecondaryText => self.secondary_text,
            ColorRole::Background => self.background,
            ColorRole::Border => self.border,
            ColorRole::Line => self.line,
            ColorRole::Accent => self.accent,
        }
    }

    /// Parse a palette from TOML, one `role = "#RRGGBB"` line per role
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read a palette from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_lookup_is_case_insensitive() {
        let palette = ThemeConfig::preset("corporate blue").unwrap();
        assert_eq!(palette.accent, Rgb::new(237, 125, 49));
        assert!(ThemeConfig::preset("Neon").is_none());
        assert!(matches!(
            ThemeConfig::require_preset("Neon"),
            Err(RenderError::UnknownPalette(_))
        ));
    }

    #[test]
    fn test_presets_listed_in_order() {
        let names: Vec<_> = ThemeConfig::presets().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, PRESET_NAMES.to_vec());
    }

    #[test]
    fn test_dark_professional_background() {
        let palette = ThemeConfig::preset(DARK_PROFESSIONAL).unwrap();
        assert_eq!(palette.background.to_hex(), "#2C3E50");
        assert_eq!(palette.primary_text, Rgb::WHITE);
    }

    #[test]
    fn test_color_by_role_covers_all_roles() {
        let palette = ThemeConfig::preset(VIBRANT).unwrap();
        assert_eq!(palette.color(ColorRole::Primary), palette.primary);
        assert_eq!(palette.color(ColorRole::Accent), palette.accent);
        assert_eq!(ColorRole::ALL.len(), 10);
    }

    #[test]
    fn test_from_toml() {
        let toml = r##"
            primary = "#4472C4"
            secondary = "#5B9BD5"
            tertiary = "#A5A5A5"
            quaternary = "#70AD47"
            primary-text = "#000000"
            secondary-text = "#444444"
            background = "#FFFFFF"
            border = "#4472C4"
            line = "#444444"
            accent = "#ED7D31"
        "##;
        let palette = ThemeConfig::from_toml_str(toml).unwrap();
        assert_eq!(palette, ThemeConfig::preset(CORPORATE_BLUE).unwrap());
    }

    #[test]
    fn test_from_toml_rejects_bad_color() {
        let toml = r##"
            primary = "blue"
        "##;
        assert!(matches!(
            ThemeConfig::from_toml_str(toml),
            Err(RenderError::DeserializationError(_))
        ));
    }
}
