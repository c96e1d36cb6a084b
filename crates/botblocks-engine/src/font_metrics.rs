//! Text measurement backed by fontdue.

use botblocks_common::warning::warn_once;
use botblocks_common::{ApproximateTextMeasure, Font, Size, TextMeasure};
use fontdue::FontSettings;

/// Common system font paths to search for the default face.
pub const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// Line height as a multiple of the font size.
const LINE_HEIGHT_RATIO: f32 = 1.2;

/// Load the first font in `paths` that exists and parses.
#[must_use]
pub fn load_font_from_paths(paths: &[&str]) -> Option<fontdue::Font> {
    paths.iter().find_map(|path| {
        let data = std::fs::read(path).ok()?;
        fontdue::Font::from_bytes(data, FontSettings::default()).ok()
    })
}

/// Load the default system face.
#[must_use]
pub fn load_system_font() -> Option<fontdue::Font> {
    load_font_from_paths(FONT_SEARCH_PATHS)
}

/// Measures text with a single loaded face.
///
/// The family in a [`Font`] request is ignored: one face serves every
/// family. Widths sum per-glyph advances, the same walk the renderer
/// uses to place glyphs, so measured and drawn text agree.
#[derive(Clone)]
pub struct FontdueMeasure {
    font: fontdue::Font,
}

impl FontdueMeasure {
    /// Measure with `font`.
    #[must_use]
    pub const fn new(font: fontdue::Font) -> Self {
        Self { font }
    }

    /// Measure with the default system face, if one is installed.
    #[must_use]
    pub fn system() -> Option<Self> {
        load_system_font().map(Self::new)
    }

    /// The face in use.
    #[must_use]
    pub const fn font(&self) -> &fontdue::Font {
        &self.font
    }
}

impl TextMeasure for FontdueMeasure {
    fn measure(&self, text: &str, font: &Font) -> Size {
        let width = text
            .chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| self.font.metrics(ch, font.size).advance_width)
            .sum();
        Size::new(width, font.size * LINE_HEIGHT_RATIO)
    }
}

/// The best available measurer: fontdue with a system face, or the fixed
/// ratio approximation when no face is installed.
#[must_use]
pub fn system_measure() -> Box<dyn TextMeasure> {
    if let Some(measure) = FontdueMeasure::system() {
        Box::new(measure)
    } else {
        warn_once(
            "font",
            "no system font found, text sizes are approximate",
        );
        Box::new(ApproximateTextMeasure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_measure_is_monotonic() {
        let measure = system_measure();
        let font = Font::new("sans", 20.0);
        let short = measure.measure("Go", &font);
        let long = measure.measure("Go forward", &font);
        assert!(long.width > short.width);
        assert!((short.height - 24.0).abs() < 1e-4);
        assert!(measure.measure("", &font).width.abs() < f32::EPSILON);
    }
}
