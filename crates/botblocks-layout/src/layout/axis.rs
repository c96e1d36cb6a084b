//! Axis abstraction so the box model is written once for rows and columns.

use botblocks_common::{Rect, Size};
use botblocks_dom::ElementKind;

/// The axis a container distributes its children along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Along x; across y.
    Horizontal,
    /// Along y; across x.
    Vertical,
}

impl Axis {
    /// Axis used by a distributing container whose current rectangle is
    /// `rect` (`None` before the first layout).
    ///
    /// Lengthwise follows the longer side, Crosswise the shorter one. Squares
    /// and unplaced nodes fall back to horizontal and vertical respectively.
    #[must_use]
    pub fn for_kind(kind: ElementKind, rect: Option<Rect>) -> Option<Self> {
        match kind {
            ElementKind::Horizontal => Some(Self::Horizontal),
            ElementKind::Vertical => Some(Self::Vertical),
            ElementKind::Lengthwise => Some(match rect {
                Some(r) if r.height > r.width => Self::Vertical,
                _ => Self::Horizontal,
            }),
            ElementKind::Crosswise => Some(match rect {
                Some(r) if r.height > r.width => Self::Horizontal,
                _ => Self::Vertical,
            }),
            _ => None,
        }
    }

    /// Start coordinate of `rect` along this axis.
    #[must_use]
    pub const fn start(self, rect: Rect) -> f32 {
        match self {
            Self::Horizontal => rect.x,
            Self::Vertical => rect.y,
        }
    }

    /// Length of `rect` along this axis.
    #[must_use]
    pub const fn length(self, rect: Rect) -> f32 {
        match self {
            Self::Horizontal => rect.width,
            Self::Vertical => rect.height,
        }
    }

    /// Extent of `size` along this axis.
    #[must_use]
    pub const fn along(self, size: Size) -> f32 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Extent of `size` across this axis.
    #[must_use]
    pub const fn across(self, size: Size) -> f32 {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    /// Build a size from along/across extents.
    #[must_use]
    pub const fn size(self, along: f32, across: f32) -> Size {
        match self {
            Self::Horizontal => Size::new(along, across),
            Self::Vertical => Size::new(across, along),
        }
    }

    /// The slice `[offset, offset + length)` of `parent` along this axis,
    /// spanning the whole of `parent` across it.
    #[must_use]
    pub const fn slice(self, parent: Rect, offset: f32, length: f32) -> Rect {
        match self {
            Self::Horizontal => Rect::new(offset, parent.y, length, parent.height),
            Self::Vertical => Rect::new(parent.x, offset, parent.width, length),
        }
    }
}
