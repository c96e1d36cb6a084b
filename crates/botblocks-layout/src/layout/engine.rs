//! Measure and place passes.

use botblocks_common::{Font, Rect, Size, TextMeasure};
use botblocks_dom::{Document, Element, ElementKind, NodeId};

use super::axis::Axis;
use super::box_model::{Sizing, min_extent, partition};

/// Padding added on every side of measured text (Text and Button).
pub const TEXT_PADDING: f32 = 10.0;

/// Upper bound on placement passes while Lengthwise and Crosswise axes settle.
const MAX_PASSES: usize = 3;

/// Lays out documents using a text-measurement collaborator.
pub struct LayoutEngine<'a> {
    measure: &'a dyn TextMeasure,
    font: Font,
}

impl<'a> LayoutEngine<'a> {
    /// Create an engine. `font` is the default for elements without a
    /// `size` attribute.
    #[must_use]
    pub fn new(measure: &'a dyn TextMeasure, font: Font) -> Self {
        Self { measure, font }
    }

    /// The font used for `element`'s text.
    #[must_use]
    pub fn font_for(&self, element: &Element) -> Font {
        element
            .font_size
            .map_or_else(|| self.font.clone(), |size| self.font.with_size(size))
    }

    /// Minimum outer size of `id`, margin included.
    ///
    /// Pure: reads the tree and the last assigned rectangles only.
    #[must_use]
    pub fn min_size(&self, document: &Document, id: NodeId) -> Size {
        let Some(element) = document.get(id) else {
            return Size::ZERO;
        };
        let children = document.children(id);
        let inner = match element.kind {
            kind if kind.is_distributing() => {
                let Some(axis) = Axis::for_kind(kind, element.rect) else {
                    return Size::ZERO;
                };
                let extents: Vec<_> = children
                    .iter()
                    .filter_map(|&c| {
                        let child = document.get(c)?;
                        let min = self.min_size(document, c);
                        Some((child.length, axis.along(min), axis.across(min)))
                    })
                    .collect();
                let (along, across) = min_extent(&extents);
                axis.size(along, across)
            }
            ElementKind::Overlap => self.overlap_min(document, children),
            ElementKind::Text => self.text_min(element),
            ElementKind::Button => self.text_min(element).max(self.overlap_min(document, children)),
            _ => Size::ZERO,
        };
        element.margin.expand(inner)
    }

    fn overlap_min(&self, document: &Document, children: &[NodeId]) -> Size {
        children
            .iter()
            .map(|&c| self.min_size(document, c))
            .fold(Size::ZERO, Size::max)
    }

    fn text_min(&self, element: &Element) -> Size {
        let measured = self.measure.measure(&element.text, &self.font_for(element));
        Size::new(
            2.0f32.mul_add(TEXT_PADDING, measured.width),
            2.0f32.mul_add(TEXT_PADDING, measured.height),
        )
    }

    /// Lay out the whole document inside `viewport`.
    ///
    /// Rebuilds the drawables list and overwrites every reachable rectangle,
    /// so calling it twice with the same viewport changes nothing.
    ///
    /// Lengthwise and Crosswise containers are measured along the axis of
    /// their last rectangle, so placement repeats until no such container
    /// changes axis.
    pub fn layout(&self, document: &mut Document, viewport: Rect) {
        for _ in 0..MAX_PASSES {
            let measured = dynamic_axes(document);
            document.clear_drawables();
            self.place(document, document.root(), viewport);
            document.finish_layout();
            if dynamic_axes(document) == measured {
                break;
            }
        }
    }

    /// Place `id` inside `rect` and recurse into its children.
    pub fn place(&self, document: &mut Document, id: NodeId, rect: Rect) {
        let Some(element) = document.get(id) else {
            return;
        };
        let kind = element.kind;
        let align = element.align;
        let inner = element.margin.apply(rect);
        let children = element.children.clone();

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[LAYOUT] place {id:?} <{kind}> at ({}, {}) {}x{}, {} children",
            inner.x,
            inner.y,
            inner.width,
            inner.height,
            children.len()
        );

        document.push_drawable(id);
        if let Some(element) = document.get_mut(id) {
            element.rect = Some(inner);
        }

        match kind {
            ElementKind::Overlap | ElementKind::Button => {
                for child in children {
                    self.place(document, child, inner);
                }
            }
            kind if kind.is_distributing() => {
                let Some(axis) = Axis::for_kind(kind, Some(inner)) else {
                    return;
                };
                let sizings: Vec<Sizing> = children
                    .iter()
                    .map(|&c| {
                        let length = document.get(c).map(|e| e.length).unwrap_or_default();
                        Sizing::new(length, axis.along(self.min_size(document, c)))
                    })
                    .collect();
                let spans = partition(&sizings, axis.start(inner), axis.length(inner), align);
                for (child, span) in children.into_iter().zip(spans) {
                    self.place(document, child, axis.slice(inner, span.offset, span.length));
                }
            }
            _ => {}
        }
    }
}

/// Axis of every shape-dependent container, from its current rectangle.
fn dynamic_axes(document: &Document) -> Vec<Option<Axis>> {
    document
        .descendants(document.root())
        .filter_map(|id| document.get(id))
        .filter(|e| matches!(e.kind, ElementKind::Lengthwise | ElementKind::Crosswise))
        .map(|e| Axis::for_kind(e.kind, e.rect))
        .collect()
}

#[cfg(test)]
mod tests {
    use botblocks_common::ApproximateTextMeasure;
    use botblocks_dom::{Attribute, Margin};

    use super::*;

    fn engine(measure: &ApproximateTextMeasure) -> LayoutEngine<'_> {
        LayoutEngine::new(measure, Font::new("sans", 10.0))
    }

    #[test]
    fn test_text_min_has_padding() {
        let measure = ApproximateTextMeasure;
        let doc = Document::new(Element::new(ElementKind::Text, vec![Attribute::new("text", "abcd")]));
        let min = engine(&measure).min_size(&doc, NodeId::ROOT);
        // 4 chars * 10 * 0.6 = 24 wide, 10 * 1.2 = 12 tall.
        assert!((min.width - 44.0).abs() < 1e-4);
        assert!((min.height - 32.0).abs() < 1e-4);
    }

    #[test]
    fn test_margin_grows_min_and_shrinks_rect() {
        let measure = ApproximateTextMeasure;
        let mut root = Element::bare(ElementKind::Overlap);
        root.margin = Margin::Pixels(5.0);
        let mut doc = Document::new(root);
        let _ = doc.append_child(NodeId::ROOT, Element::bare(ElementKind::Space));
        let engine = engine(&measure);
        assert_eq!(engine.min_size(&doc, NodeId::ROOT), Size::new(10.0, 10.0));

        engine.layout(&mut doc, Rect::new(0.0, 0.0, 100.0, 50.0));
        let rect = doc.get(NodeId::ROOT).and_then(|e| e.rect);
        assert_eq!(rect, Some(Rect::new(5.0, 5.0, 90.0, 40.0)));
    }
}
