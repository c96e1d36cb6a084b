//! Text measurement seam.

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// A font request: family name plus pixel size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// Family name, resolved by the measurement backend.
    pub family: String,
    /// Pixel size.
    pub size: f32,
}

impl Font {
    /// Create a font request.
    #[must_use]
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    /// Same family at another size.
    #[must_use]
    pub fn with_size(&self, size: f32) -> Self {
        Self {
            family: self.family.clone(),
            size,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("sans", 30.0)
    }
}

/// Measures rendered text in pixels.
///
/// Used by the layout engine for Text and Button minimums and by the program
/// editor to size block labels.
pub trait TextMeasure {
    /// Pixel width and height of `text` rendered in `font`.
    fn measure(&self, text: &str, font: &Font) -> Size;
}

/// Fixed-ratio approximation used when no font backend is loaded.
///
/// Every character is `0.6 × size` wide and a line is `1.2 × size` tall.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateTextMeasure;

impl TextMeasure for ApproximateTextMeasure {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, text: &str, font: &Font) -> Size {
        const CHAR_WIDTH_RATIO: f32 = 0.6;
        const LINE_HEIGHT_RATIO: f32 = 1.2;
        Size {
            width: text.chars().count() as f32 * font.size * CHAR_WIDTH_RATIO,
            height: font.size * LINE_HEIGHT_RATIO,
        }
    }
}
