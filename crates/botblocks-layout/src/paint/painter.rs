//! Painter: walks the drawables list and emits commands.

use botblocks_common::{Color, Font, ImageProvider, Rect};
use botblocks_dom::{Document, Element, ElementKind, ImageAlign, ImageAttrs};

use super::{DisplayCommand, DisplayList};
use crate::layout::TEXT_PADDING;

/// Translucent magenta behind every button.
pub const BUTTON_FILL: Color = Color::from_u32(0xFF00_FF7F);

const TEXT_COLOR: Color = Color::WHITE;

/// Generates a display list from a laid-out document.
pub struct Painter<'a> {
    images: &'a dyn ImageProvider,
    font: Font,
    debug_outlines: bool,
}

impl<'a> Painter<'a> {
    /// Create a painter. `font` is the default for elements without a
    /// `size` attribute.
    #[must_use]
    pub fn new(images: &'a dyn ImageProvider, font: Font) -> Self {
        Self {
            images,
            font,
            debug_outlines: false,
        }
    }

    /// Also outline every container, colour-coded by kind.
    #[must_use]
    pub const fn with_debug_outlines(mut self, enabled: bool) -> Self {
        self.debug_outlines = enabled;
        self
    }

    /// Paint every drawable of `document`, in layout order.
    #[must_use]
    pub fn paint(&self, document: &Document) -> DisplayList {
        let mut list = DisplayList::new();
        for &id in document.drawables() {
            if let Some(element) = document.get(id)
                && let Some(rect) = element.rect
            {
                self.paint_element(element, rect, &mut list);
            }
        }
        list
    }

    fn paint_element(&self, element: &Element, rect: Rect, list: &mut DisplayList) {
        match element.kind {
            ElementKind::Button => {
                list.push(DisplayCommand::FillRect {
                    rect,
                    color: BUTTON_FILL,
                });
                list.push(DisplayCommand::StrokeRect {
                    rect,
                    color: Color::rgba(0xFF, 0x00, 0xFF, 0xFF),
                    width: 1.0,
                });
                self.paint_text(element, rect, list);
            }
            ElementKind::Text => self.paint_text(element, rect, list),
            ElementKind::Image => {
                if let Some(image) = &element.image {
                    self.paint_image(image, rect, list);
                }
            }
            kind => {
                if element.color.is_visible() {
                    list.push(DisplayCommand::FillRect {
                        rect,
                        color: element.color,
                    });
                }
                if self.debug_outlines
                    && let Some(color) = outline_color(kind)
                {
                    list.push(DisplayCommand::StrokeRect {
                        rect,
                        color,
                        width: 1.0,
                    });
                }
            }
        }
    }

    fn paint_text(&self, element: &Element, rect: Rect, list: &mut DisplayList) {
        if element.text.is_empty() {
            return;
        }
        list.push(DisplayCommand::DrawText {
            x: rect.x + TEXT_PADDING,
            y: rect.y + TEXT_PADDING,
            text: element.text.clone(),
            font_size: element.font_size.unwrap_or(self.font.size),
            color: TEXT_COLOR,
        });
    }

    fn paint_image(&self, image: &ImageAttrs, rect: Rect, list: &mut DisplayList) {
        if self.debug_outlines {
            list.push(DisplayCommand::StrokeRect {
                rect,
                color: Color::rgba(0x00, 0x00, 0xFF, 0xFF),
                width: 1.0,
            });
        }
        #[allow(clippy::cast_precision_loss)]
        let natural = self
            .images
            .dimensions(&image.source)
            .map(|(w, h)| (w as f32, h as f32))
            .or_else(|| image.width.zip(image.height));
        let target = natural.map_or(rect, |(w, h)| fit(rect, w, h, image.align));
        list.push(DisplayCommand::DrawImage {
            rect: target,
            source: image.source.clone(),
        });
    }
}

/// Scale a `width`×`height` picture to fit inside `rect`, keeping its aspect
/// ratio, and position it on the free axis according to `align`.
#[must_use]
pub fn fit(rect: Rect, width: f32, height: f32, align: ImageAlign) -> Rect {
    if width <= 0.0 || height <= 0.0 || rect.width <= 0.0 || rect.height <= 0.0 {
        return rect;
    }
    if rect.width / rect.height > width / height {
        let w = width * rect.height / height;
        let x = match align {
            ImageAlign::Left => rect.x,
            ImageAlign::Right => rect.right() - w,
            _ => rect.x + (rect.width - w) / 2.0,
        };
        Rect::new(x, rect.y, w, rect.height)
    } else {
        let h = height * rect.width / width;
        let y = match align {
            ImageAlign::Up => rect.y,
            ImageAlign::Down => rect.bottom() - h,
            _ => rect.y + (rect.height - h) / 2.0,
        };
        Rect::new(rect.x, y, rect.width, h)
    }
}

const fn outline_color(kind: ElementKind) -> Option<Color> {
    match kind {
        ElementKind::Horizontal => Some(Color::rgba(0xFF, 0x00, 0x00, 0xFF)),
        ElementKind::Vertical => Some(Color::rgba(0x00, 0xFF, 0x00, 0xFF)),
        ElementKind::Overlap => Some(Color::rgba(0xFF, 0xFF, 0x00, 0xFF)),
        ElementKind::Lengthwise | ElementKind::Crosswise => Some(Color::rgba(0x00, 0xFF, 0xFF, 0xFF)),
        _ => None,
    }
}
