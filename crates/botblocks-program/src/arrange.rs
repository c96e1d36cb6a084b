//! Screen placement of blocks, and the point queries drag-and-drop needs.
//!
//! Blocks stack top to bottom. A container is a header row (its label), an
//! indented body and a footer bar; an empty body keeps a fixed height so
//! there is somewhere to drop into.

use botblocks_common::{Font, Point, Rect, Size, TextMeasure};
use serde::{Deserialize, Serialize};

use crate::block::CodeBlock;
use crate::cursor::Cursor;
use crate::program::Program;

/// Block geometry parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockStyle {
    /// Label font.
    pub font: Font,
    /// Space around a label.
    pub padding: f32,
    /// Horizontal inset of a container body.
    pub indent: f32,
    /// Vertical space between siblings.
    pub spacing: f32,
    /// Height of a container's closing bar.
    pub footer: f32,
    /// Height of an empty container body.
    pub empty_body: f32,
    /// Narrowest block.
    pub min_width: f32,
    /// Height of the hole left at the cursor while dragging.
    pub cursor_gap: f32,
}

impl Default for BlockStyle {
    fn default() -> Self {
        Self {
            font: Font::new("sans", 20.0),
            padding: 8.0,
            indent: 24.0,
            spacing: 4.0,
            footer: 12.0,
            empty_body: 24.0,
            min_width: 120.0,
            cursor_gap: 40.0,
        }
    }
}

struct ArrangeContext<'a> {
    style: &'a BlockStyle,
    measure: &'a dyn TextMeasure,
    gap: Option<&'a Cursor>,
}

impl Program {
    /// Recompute every block rectangle with the top-level list starting at
    /// `origin`. With `show_gap`, a hole is left at the cursor.
    pub fn arrange(&mut self, origin: Point, measure: &dyn TextMeasure, show_gap: bool) {
        self.origin = origin;
        let cursor = self.cursor.clone();
        let style = self.style.clone();
        let context = ArrangeContext {
            style: &style,
            measure,
            gap: show_gap.then_some(&cursor),
        };
        let _ = arrange_list(&mut self.blocks, origin, &mut Vec::new(), &context);
    }

    /// Path of the innermost block containing `pos`.
    #[must_use]
    pub fn block_at(&self, pos: Point) -> Option<Vec<usize>> {
        find(&self.blocks, pos, &mut Vec::new())
    }

    /// The insertion point closest to `pos`.
    ///
    /// Candidates are every block's top-left corner, the point just below
    /// the last block of every list, and the body of every empty container.
    /// Distances are squared Euclidean; the first candidate wins ties. An
    /// empty program answers `[0]`.
    #[must_use]
    pub fn nearest_insertion_point(&self, pos: Point) -> Cursor {
        let mut best: Option<(f32, Vec<usize>)> = None;
        self.search(&self.blocks, self.origin, &mut Vec::new(), pos, &mut best);
        best.and_then(|(_, path)| Cursor::new(path).ok())
            .unwrap_or_default()
    }

    fn search(
        &self,
        list: &[CodeBlock],
        list_origin: Point,
        scope: &mut Vec<usize>,
        pos: Point,
        best: &mut Option<(f32, Vec<usize>)>,
    ) {
        if list.is_empty() {
            consider(best, pos, list_origin, scope, 0);
            return;
        }
        for (i, block) in list.iter().enumerate() {
            let Some(rect) = block.rect else {
                continue;
            };
            consider(best, pos, rect.origin(), scope, i);
            if let Some(body) = block.children() {
                // Only used when the body is empty.
                let body_origin = Point::new(
                    rect.x + self.style.indent,
                    rect.bottom() - self.style.footer - self.style.empty_body,
                );
                scope.push(i);
                self.search(body, body_origin, scope, pos, best);
                let _ = scope.pop();
            }
            if i + 1 == list.len() {
                consider(best, pos, Point::new(rect.x, rect.bottom()), scope, i + 1);
            }
        }
    }
}

/// Keep `scope + [index]` if its anchor is strictly closer than the best so far.
fn consider(
    best: &mut Option<(f32, Vec<usize>)>,
    pos: Point,
    anchor: Point,
    scope: &[usize],
    index: usize,
) {
    let distance = anchor.distance_squared(pos);
    if best.as_ref().is_none_or(|(d, _)| distance < *d) {
        let mut path = scope.to_vec();
        path.push(index);
        *best = Some((distance, path));
    }
}

fn arrange_list(
    list: &mut [CodeBlock],
    origin: Point,
    scope: &mut Vec<usize>,
    context: &ArrangeContext<'_>,
) -> Size {
    let style = context.style;
    let gap_at = context
        .gap
        .filter(|cursor| cursor.scope() == scope.as_slice())
        .map(Cursor::offset);
    let mut y = origin.y;
    let mut width = 0.0_f32;
    let len = list.len();
    for (i, block) in list.iter_mut().enumerate() {
        if gap_at == Some(i) {
            y += style.cursor_gap + style.spacing;
        }
        scope.push(i);
        let size = arrange_block(block, Point::new(origin.x, y), scope, context);
        let _ = scope.pop();
        y += size.height + style.spacing;
        width = width.max(size.width);
    }
    if gap_at == Some(len) {
        y += style.cursor_gap + style.spacing;
    }
    Size::new(width, (y - origin.y - style.spacing).max(0.0))
}

fn arrange_block(
    block: &mut CodeBlock,
    at: Point,
    scope: &mut Vec<usize>,
    context: &ArrangeContext<'_>,
) -> Size {
    let style = context.style;
    let text = context.measure.measure(&block.label(), &style.font);
    let header = Size::new(
        2.0f32.mul_add(style.padding, text.width).max(style.min_width),
        2.0f32.mul_add(style.padding, text.height),
    );
    let size = match block.children_mut() {
        None => header,
        Some(body) => {
            let body_origin = Point::new(at.x + style.indent, at.y + header.height);
            let inner = arrange_list(body, body_origin, scope, context);
            Size::new(
                header.width.max(style.indent + inner.width),
                header.height + inner.height.max(style.empty_body) + style.footer,
            )
        }
    };
    block.rect = Some(Rect::new(at.x, at.y, size.width, size.height));
    size
}

fn find(list: &[CodeBlock], pos: Point, scope: &mut Vec<usize>) -> Option<Vec<usize>> {
    for (i, block) in list.iter().enumerate() {
        if block.rect.is_some_and(|rect| rect.contains(pos)) {
            scope.push(i);
            if let Some(body) = block.children()
                && let Some(inner) = find(body, pos, scope)
            {
                return Some(inner);
            }
            return Some(scope.clone());
        }
    }
    None
}
