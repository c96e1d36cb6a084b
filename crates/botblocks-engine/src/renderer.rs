//! Software renderer for headless screenshots.
//!
//! Executes a [`DisplayList`] into an RGBA buffer, rasterising text with
//! fontdue. It knows nothing about markup, layout or blocks:
//!
//! ```text
//! Layout → Paint → Render
//!            ↓        ↓
//!      DisplayList → Pixels
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use botblocks_common::warning::warn_once;
use botblocks_common::{Color, Rect};
use botblocks_layout::{DisplayCommand, DisplayList, RenderSurface};
use fontdue::Font;
use image::{ImageBuffer, Rgba, RgbaImage};

/// Fill used where an image could not be loaded.
const MISSING_IMAGE: Color = Color::rgba(128, 128, 128, 255);

/// Software render surface backed by an RGBA pixel buffer.
pub struct Renderer {
    buffer: RgbaImage,
    width: u32,
    height: u32,
    /// Text face; `None` skips text.
    font: Option<Font>,
    /// Decoded images keyed by source path.
    images: HashMap<String, RgbaImage>,
}

impl Renderer {
    /// A `width × height` surface cleared to `background`.
    #[must_use]
    pub fn new(
        width: u32,
        height: u32,
        background: Color,
        font: Option<Font>,
        images: HashMap<String, RgbaImage>,
    ) -> Self {
        if font.is_none() {
            warn_once("render", "no font loaded, text will not be drawn");
        }
        Self {
            buffer: ImageBuffer::from_pixel(width, height, to_rgba(background)),
            width,
            height,
            font,
            images,
        }
    }

    /// Execute every command, back to front.
    pub fn render(&mut self, display_list: &DisplayList) {
        display_list.replay(self);
    }

    /// Colour of one pixel, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        (x < self.width && y < self.height).then(|| {
            let Rgba([r, g, b, a]) = *self.buffer.get_pixel(x, y);
            Color::rgba(r, g, b, a)
        })
    }

    /// The rendered pixels.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.buffer
    }

    /// Save the rendered image; the format follows the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be encoded or written.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.buffer.save(path).map_err(|e| {
            anyhow::anyhow!("failed to save screenshot to '{}': {e}", path.display())
        })?;
        Ok(())
    }

    /// Blend one pixel, ignoring coordinates off the surface.
    #[allow(clippy::cast_sign_loss)]
    fn blend_pixel(&mut self, px: i32, py: i32, color: Rgba<u8>, alpha: u8) {
        if px < 0 || py < 0 || px as u32 >= self.width || py as u32 >= self.height {
            return;
        }
        blend(&mut self.buffer, px as u32, py as u32, color, alpha);
    }

    /// Pixel span `[x0, x1) × [y0, y1)` of `rect` that lies on the surface.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn visible_span(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let clamp = |v: f32, max: u32| v.round().clamp(0.0, max as f32) as u32;
        let (x0, x1) = (clamp(rect.x, self.width), clamp(rect.right(), self.width));
        let (y0, y1) = (clamp(rect.y, self.height), clamp(rect.bottom(), self.height));
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if !color.is_visible() {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.visible_span(rect) else {
            return;
        };
        let rgba = to_rgba(color);
        for py in y0..y1 {
            for px in x0..x1 {
                blend(&mut self.buffer, px, py, rgba, color.a);
            }
        }
    }

    /// Outline `rect` with the stroke inside its edges.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        let w = width.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
        if w <= 0.0 {
            return;
        }
        let inner_height = rect.height - 2.0 * w;
        self.fill_rect(Rect::new(rect.x, rect.y, rect.width, w), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - w, rect.width, w), color);
        self.fill_rect(Rect::new(rect.x, rect.y + w, w, inner_height), color);
        self.fill_rect(Rect::new(rect.right() - w, rect.y + w, w, inner_height), color);
    }

    /// Draw an image scaled to `rect` with nearest-neighbour sampling.
    ///
    /// Only the part of `rect` on the surface is visited; samples are taken
    /// relative to the unclipped rectangle.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn draw_image(&mut self, source: &str, rect: Rect) {
        if !self.images.contains_key(source) {
            warn_once("render", &format!("image '{source}' was not decoded"));
            self.fill_rect(rect, MISSING_IMAGE);
            return;
        }
        let Some((x0, y0, x1, y1)) = self.visible_span(rect) else {
            return;
        };
        let dest_w = rect.width.round().max(0.0) as u64;
        let dest_h = rect.height.round().max(0.0) as u64;
        let (origin_x, origin_y) = (rect.x.round() as i64, rect.y.round() as i64);
        let Self { buffer, images, .. } = self;
        let Some(img) = images.get(source) else {
            return;
        };
        let (src_w, src_h) = img.dimensions();
        if src_w == 0 || src_h == 0 || dest_w == 0 || dest_h == 0 {
            return;
        }

        let sample = |offset: i64, dest: u64, src: u32| -> u32 {
            let offset = offset.max(0) as u64;
            ((offset * u64::from(src)) / dest).min(u64::from(src) - 1) as u32
        };
        for py in y0..y1 {
            let sy = sample(i64::from(py) - origin_y, dest_h, src_h);
            for px in x0..x1 {
                let sx = sample(i64::from(px) - origin_x, dest_w, src_w);
                let fg = *img.get_pixel(sx, sy);
                blend(buffer, px, py, fg, fg[3]);
            }
        }
    }

    /// Draw one line of text with its top-left corner at `(x, y)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, color: Color) {
        let Some(font) = self.font.take() else {
            return;
        };
        let rgba = to_rgba(color);
        let mut cursor_x = x;

        for ch in text.chars().filter(|ch| !ch.is_control()) {
            let (metrics, bitmap) = font.rasterize(ch, font_size);
            let glyph_x = cursor_x as i32 + metrics.xmin;
            let glyph_y = y as i32 + (font_size as i32 - metrics.ymin - metrics.height as i32);

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx];
                    let alpha = (u16::from(coverage) * u16::from(color.a) / 255) as u8;
                    self.blend_pixel(glyph_x + gx as i32, glyph_y + gy as i32, rgba, alpha);
                }
            }
            cursor_x += metrics.advance_width;
        }
        self.font = Some(font);
    }
}

impl RenderSurface for Renderer {
    fn draw(&mut self, command: &DisplayCommand) {
        match command {
            DisplayCommand::FillRect { rect, color } => self.fill_rect(*rect, *color),
            DisplayCommand::StrokeRect { rect, color, width } => {
                self.stroke_rect(*rect, *color, *width);
            }
            DisplayCommand::DrawText {
                x,
                y,
                text,
                font_size,
                color,
            } => self.draw_text(text, *x, *y, *font_size, *color),
            DisplayCommand::DrawImage { rect, source } => self.draw_image(source, *rect),
        }
    }
}

/// Blend `color` over the pixel at `(px, py)`, which must be on `buffer`.
fn blend(buffer: &mut RgbaImage, px: u32, py: u32, color: Rgba<u8>, alpha: u8) {
    if alpha == 255 {
        buffer.put_pixel(px, py, color);
    } else if alpha > 0 {
        let bg = *buffer.get_pixel(px, py);
        buffer.put_pixel(px, py, alpha_blend(color, bg, alpha));
    }
}

const fn to_rgba(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, 255])
}

/// Alpha blend a foreground colour onto a background colour.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha_blend(fg: Rgba<u8>, bg: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = f32::from(alpha) / 255.0;
    let inv_a = 1.0 - a;

    Rgba([
        f32::from(fg[0]).mul_add(a, f32::from(bg[0]) * inv_a) as u8,
        f32::from(fg[1]).mul_add(a, f32::from(bg[1]) * inv_a) as u8,
        f32::from(fg[2]).mul_add(a, f32::from(bg[2]) * inv_a) as u8,
        255,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> Renderer {
        Renderer::new(20, 10, Color::WHITE, None, HashMap::new())
    }

    #[test]
    fn test_fill_is_clipped_to_surface() {
        let mut renderer = blank();
        renderer.draw(&DisplayCommand::FillRect {
            rect: Rect::new(-5.0, -5.0, 10.0, 10.0),
            color: Color::BLACK,
        });
        assert_eq!(renderer.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(renderer.pixel(4, 4), Some(Color::BLACK));
        assert_eq!(renderer.pixel(5, 5), Some(Color::WHITE));
        assert_eq!(renderer.pixel(20, 0), None);
    }

    #[test]
    fn test_translucent_fill_blends() {
        let mut renderer = blank();
        renderer.draw(&DisplayCommand::FillRect {
            rect: Rect::new(0.0, 0.0, 20.0, 10.0),
            color: Color::rgba(0, 0, 0, 128),
        });
        let px = renderer.pixel(3, 3).expect("inside");
        assert!(px.r > 100 && px.r < 150);
        assert_eq!(px.a, 255);
    }

    #[test]
    fn test_stroke_leaves_interior() {
        let mut renderer = blank();
        renderer.draw(&DisplayCommand::StrokeRect {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            color: Color::BLACK,
            width: 1.0,
        });
        assert_eq!(renderer.pixel(0, 5), Some(Color::BLACK));
        assert_eq!(renderer.pixel(9, 5), Some(Color::BLACK));
        assert_eq!(renderer.pixel(5, 9), Some(Color::BLACK));
        assert_eq!(renderer.pixel(5, 5), Some(Color::WHITE));
    }

    #[test]
    fn test_image_scaled_and_missing_placeholder() {
        let mut images = HashMap::new();
        let _ = images.insert(
            "red.png".to_string(),
            ImageBuffer::from_pixel(2, 2, Rgba([255, 0, 0, 255])),
        );
        let mut renderer = Renderer::new(20, 10, Color::WHITE, None, images);
        renderer.draw(&DisplayCommand::DrawImage {
            rect: Rect::new(0.0, 0.0, 8.0, 8.0),
            source: "red.png".into(),
        });
        renderer.draw(&DisplayCommand::DrawImage {
            rect: Rect::new(10.0, 0.0, 4.0, 4.0),
            source: "gone.png".into(),
        });
        assert_eq!(renderer.pixel(7, 7), Some(Color::rgba(255, 0, 0, 255)));
        assert_eq!(renderer.pixel(11, 1), Some(MISSING_IMAGE));
        assert_eq!(renderer.pixel(15, 1), Some(Color::WHITE));
    }

    #[test]
    fn test_oversized_image_only_touches_visible_pixels() {
        let mut images = HashMap::new();
        let mut checker = ImageBuffer::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        checker.put_pixel(1, 1, Rgba([0, 0, 255, 255]));
        let _ = images.insert("checker.png".to_string(), checker);
        let mut renderer = Renderer::new(20, 10, Color::WHITE, None, images);

        // Far larger than the surface in both directions.
        renderer.draw(&DisplayCommand::DrawImage {
            rect: Rect::new(0.0, 0.0, 70_000.0, 70_000.0),
            source: "checker.png".into(),
        });
        assert_eq!(renderer.pixel(19, 9), Some(Color::rgba(255, 0, 0, 255)));

        // Partly off the top-left corner: the visible quarter is the blue one.
        renderer.draw(&DisplayCommand::DrawImage {
            rect: Rect::new(-10.0, -10.0, 20.0, 20.0),
            source: "checker.png".into(),
        });
        assert_eq!(renderer.pixel(0, 0), Some(Color::rgba(0, 0, 255, 255)));
        assert_eq!(renderer.pixel(9, 9), Some(Color::rgba(0, 0, 255, 255)));
        // Right of the rectangle, still from the first draw.
        assert_eq!(renderer.pixel(10, 9), Some(Color::rgba(255, 0, 0, 255)));
    }
}
