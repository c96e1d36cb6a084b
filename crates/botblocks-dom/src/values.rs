//! Typed attribute values.
//!
//! Sizing, margin and alignment attributes arrive as strings with unit
//! suffixes (`"50%"`, `"12px"`, `"min"`). They are parsed once when an
//! [`Element`](crate::Element) is built so layout never re-reads strings.

use std::str::FromStr;

use botblocks_common::{Rect, Size};
use serde::Serialize;

/// An attribute value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {attribute} value '{value}'")]
pub struct InvalidValue {
    /// Attribute name.
    pub attribute: &'static str,
    /// Offending raw value.
    pub value: String,
}

/// Parse `"<number><suffix>"` into a finite number.
fn parse_suffixed(raw: &str, suffix: &str) -> Option<f32> {
    raw.strip_suffix(suffix)?
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Sizing policy of a child along its parent's distribution axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum Length {
    /// Share leftover space with the other auto children.
    #[default]
    Auto,
    /// Percentage (0-100) of the parent's original available length.
    Percent(f32),
    /// Exact pixel length.
    Pixels(f32),
    /// Exactly the child's intrinsic minimum.
    Min,
}

impl FromStr for Length {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        match raw {
            "auto" => Ok(Self::Auto),
            "min" => Ok(Self::Min),
            _ => parse_suffixed(raw, "%")
                .map(Self::Percent)
                .or_else(|| parse_suffixed(raw, "px").map(Self::Pixels))
                .ok_or_else(|| InvalidValue {
                    attribute: "length",
                    value: s.to_string(),
                }),
        }
    }
}

/// Inward offset applied to a node's rectangle before its children are placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Margin {
    /// The same pixel inset on every side.
    Pixels(f32),
    /// Percentage (0-100) of the width on the left/right sides and of the
    /// height on the top/bottom sides.
    Percent(f32),
}

impl Default for Margin {
    fn default() -> Self {
        Self::Pixels(0.0)
    }
}

impl FromStr for Margin {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        parse_suffixed(raw, "%")
            .map(Self::Percent)
            .or_else(|| parse_suffixed(raw, "px").map(Self::Pixels))
            .ok_or_else(|| InvalidValue {
                attribute: "margin",
                value: s.to_string(),
            })
    }
}

impl Margin {
    /// Shrink `rect` by this margin.
    #[must_use]
    pub fn apply(self, rect: Rect) -> Rect {
        match self {
            Self::Pixels(px) => rect.inset(px, px),
            Self::Percent(pct) => rect.inset(rect.width * pct / 100.0, rect.height * pct / 100.0),
        }
    }

    /// Grow an inner minimum size to the outer size that leaves room for
    /// this margin.
    ///
    /// Percent margins divide by the fraction left over after both sides;
    /// when the sides already claim everything the inner size is returned
    /// unchanged.
    #[must_use]
    pub fn expand(self, inner: Size) -> Size {
        match self {
            Self::Pixels(px) => Size::new(px.mul_add(2.0, inner.width), px.mul_add(2.0, inner.height)),
            Self::Percent(pct) => {
                let remaining = 1.0 - 2.0 * pct / 100.0;
                if remaining > 0.0 {
                    Size::new(inner.width / remaining, inner.height / remaining)
                } else {
                    inner
                }
            }
        }
    }
}

/// How a container spends leftover space along its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Align {
    /// Pack at the start (left or top).
    Before,
    /// Pack at the end (right or bottom).
    After,
    /// Pack in the middle.
    Center,
    /// Equal gaps before, between and after the children.
    Distribute,
    /// Equal gaps between the children only.
    #[default]
    Justify,
    /// Like [`Align::Justify`], but auto children grow in proportion to their
    /// minimums instead of splitting leftover space evenly.
    Proportional,
}

/// Which aliases an `align` attribute may use on a given container kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignAliases {
    /// `left` / `right`.
    Horizontal,
    /// `up` / `down`.
    Vertical,
    /// Both pairs, for containers whose axis is chosen at layout time.
    Either,
}

impl Align {
    /// Parse an `align` value, accepting the axis aliases permitted by
    /// `aliases`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidValue`] for unknown keywords and for aliases that do
    /// not belong to the container's axis.
    pub fn parse(raw: &str, aliases: AlignAliases) -> Result<Self, InvalidValue> {
        let horizontal = matches!(aliases, AlignAliases::Horizontal | AlignAliases::Either);
        let vertical = matches!(aliases, AlignAliases::Vertical | AlignAliases::Either);
        match raw.trim() {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            "left" if horizontal => Ok(Self::Before),
            "right" if horizontal => Ok(Self::After),
            "up" if vertical => Ok(Self::Before),
            "down" if vertical => Ok(Self::After),
            "center" | "centre" => Ok(Self::Center),
            "distribute" => Ok(Self::Distribute),
            "justify" => Ok(Self::Justify),
            "proportional" => Ok(Self::Proportional),
            _ => Err(InvalidValue {
                attribute: "align",
                value: raw.to_string(),
            }),
        }
    }
}

/// Where an image sits inside its rectangle once scaled to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ImageAlign {
    /// Flush left (when the rectangle is wider than the image).
    Left,
    /// Flush right (when the rectangle is wider than the image).
    Right,
    /// Flush top (when the rectangle is taller than the image).
    Up,
    /// Flush bottom (when the rectangle is taller than the image).
    Down,
    /// Centred on the free axis.
    #[default]
    Center,
}

impl FromStr for ImageAlign {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "center" | "centre" => Ok(Self::Center),
            _ => Err(InvalidValue {
                attribute: "align",
                value: s.to_string(),
            }),
        }
    }
}
