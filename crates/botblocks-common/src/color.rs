//! RGBA colours.

use serde::{Deserialize, Serialize};

/// sRGB colour with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel (0-255).
    pub r: u8,
    /// Green channel (0-255).
    pub g: u8,
    /// Blue channel (0-255).
    pub b: u8,
    /// Alpha channel (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Color {
    /// Fully transparent black, the default fill of every container.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Black (#000000).
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);

    /// White (#ffffff).
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    /// Create a colour from its four channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack a `0xRRGGBBAA` literal.
    #[must_use]
    pub const fn from_u32(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_be_bytes();
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    ///
    /// Six digits are opaque. Anything else is rejected.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Whether painting this colour would change any pixel.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        self.a > 0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#ff0080"), Some(Color::rgba(255, 0, 128, 255)));
        assert_eq!(Color::from_hex("#ff00807f"), Some(Color::rgba(255, 0, 128, 127)));
        assert_eq!(Color::from_hex("ff0080"), None);
        assert_eq!(Color::from_hex("#ff00"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
    }

    #[test]
    fn test_from_u32() {
        assert_eq!(Color::from_u32(0xFF00_FF7F), Color::rgba(255, 0, 255, 127));
    }
}
