//! 8-bit RGB colors with `#RRGGBB` parsing and lightening

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::RenderError;

/// Opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from hex color (e.g., 0x4472C4)
    #[inline]
    pub const fn from_hex(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// `#RRGGBB`, uppercase, no alpha
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Blend each channel toward white by `factor` (clamped to 0..=1)
    pub fn lighten(&self, factor: f32) -> Self {
        Self::new(
            lighten_channel(self.r, factor),
            lighten_channel(self.g, factor),
            lighten_channel(self.b, factor),
        )
    }
}

/// `min(255, v + (255 - v) * factor)`, truncated toward zero
#[inline]
pub fn lighten_channel(value: u8, factor: f32) -> u8 {
    let factor = factor.clamp(0.0, 1.0);
    let v = f32::from(value);
    let lightened = v + (255.0 - v) * factor;
    // truncation, not rounding
    lightened.min(255.0) as u8
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RenderError::InvalidColor(Arc::new(s.to_string()));

        let digits = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let hex = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        Ok(Self::from_hex(hex))
    }
}

impl TryFrom<String> for Rgb {
    type Error = RenderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_to_hex_is_uppercase() {
        assert_eq!(Rgb::new(68, 114, 196).to_hex(), "#4472C4");
        assert_eq!(Rgb::new(0, 10, 255).to_hex(), "#000AFF");
        assert_eq!(Rgb::WHITE.to_string(), "#FFFFFF");
    }

    #[test]
    fn test_parse_roundtrip() {
        let color: Rgb = "#ed7d31".parse().unwrap();
        assert_eq!(color, Rgb::new(237, 125, 49));
        assert_eq!(color.to_hex(), "#ED7D31");
    }

    #[rstest]
    #[case("ED7D31")]
    #[case("#ED7D3")]
    #[case("#ED7D31FF")]
    #[case("#GG0000")]
    #[case("")]
    fn test_parse_rejects_malformed(#[case] input: &str) {
        assert!(matches!(
            input.parse::<Rgb>(),
            Err(RenderError::InvalidColor(_))
        ));
    }

    #[rstest]
    #[case(0, 0.1, 25)]
    #[case(0, 0.2, 51)]
    #[case(237, 0.8, 251)]
    #[case(125, 0.8, 229)]
    #[case(49, 0.8, 213)]
    #[case(255, 0.5, 255)]
    fn test_lighten_channel_truncates(#[case] value: u8, #[case] factor: f32, #[case] expected: u8) {
        assert_eq!(lighten_channel(value, factor), expected);
    }

    #[test]
    fn test_lighten_identity_and_white() {
        for v in 0..=255u8 {
            assert_eq!(lighten_channel(v, 0.0), v);
            assert_eq!(lighten_channel(v, 1.0), 255);
        }
    }

    #[test]
    fn test_lighten_is_per_channel() {
        let color = Rgb::new(44, 62, 80).lighten(0.1);
        assert_eq!(
            color,
            Rgb::new(
                lighten_channel(44, 0.1),
                lighten_channel(62, 0.1),
                lighten_channel(80, 0.1)
            )
        );
    }
}
