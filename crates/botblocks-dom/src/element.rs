//! Element nodes and the closed tag vocabulary.

use botblocks_common::warning::warn_once;
use botblocks_common::{Color, Rect};
use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};

use crate::NodeId;
use crate::values::{Align, AlignAliases, ImageAlign, Length, Margin};

/// Every tag the markup may use.
///
/// Container kinds take an end tag and hold children; void kinds must not
/// have one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Row: children distributed along x.
    Horizontal,
    /// Column: children distributed along y.
    Vertical,
    /// Distributes along the longer side of its rectangle.
    Lengthwise,
    /// Distributes along the shorter side of its rectangle.
    Crosswise,
    /// Stacks every child over the same rectangle.
    Overlap,
    /// Single line of text.
    Text,
    /// Clickable labelled box.
    Button,
    /// Picture scaled to fit.
    Image,
    /// Empty or solid-filled spacer.
    Space,
}

impl ElementKind {
    /// Whether this kind takes an end tag and may hold children.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::Horizontal
                | Self::Vertical
                | Self::Lengthwise
                | Self::Crosswise
                | Self::Overlap
                | Self::Button
        )
    }

    /// Whether this kind forbids an end tag.
    #[must_use]
    pub const fn is_void(self) -> bool {
        !self.is_container()
    }

    /// Whether this kind distributes its children with the box model.
    #[must_use]
    pub const fn is_distributing(self) -> bool {
        matches!(
            self,
            Self::Horizontal | Self::Vertical | Self::Lengthwise | Self::Crosswise
        )
    }

    const fn align_aliases(self) -> AlignAliases {
        match self {
            Self::Horizontal => AlignAliases::Horizontal,
            Self::Vertical => AlignAliases::Vertical,
            _ => AlignAliases::Either,
        }
    }
}

/// A raw `name="value"` pair, kept in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Decoded value (empty for bare attributes).
    pub value: String,
}

impl Attribute {
    /// Create an attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Image-specific attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageAttrs {
    /// Path handed to the image provider.
    pub source: String,
    /// Placement of the fitted picture inside the rectangle.
    pub align: ImageAlign,
    /// Aspect width used when the provider does not know the image.
    pub width: Option<f32>,
    /// Aspect height used when the provider does not know the image.
    pub height: Option<f32>,
}

/// A node in the retained UI tree.
///
/// The interpreted attributes are parsed once here; the raw list stays
/// available for callbacks that want their own keys.
#[derive(Debug, Clone)]
pub struct Element {
    /// Tag kind.
    pub kind: ElementKind,
    /// Raw attributes in source order.
    pub attrs: Vec<Attribute>,
    /// Sizing policy along the parent's axis.
    pub length: Length,
    /// Inward margin.
    pub margin: Margin,
    /// Leftover-space policy (containers only).
    pub align: Align,
    /// Fill colour.
    pub color: Color,
    /// Stable identifier (`id`).
    pub id: Option<String>,
    /// Click-callback name (`onclick`).
    pub on_click: Option<String>,
    /// Text payload: the `text` attribute followed by any character data.
    pub text: String,
    /// Font size override (`size`).
    pub font_size: Option<f32>,
    /// Image attributes (Image only).
    pub image: Option<ImageAttrs>,
    /// Owning parent; `None` for the root and for detached nodes.
    pub parent: Option<NodeId>,
    /// Ordered children.
    pub children: Vec<NodeId>,
    /// Rectangle assigned by the last layout pass.
    pub rect: Option<Rect>,
}

impl Element {
    /// Build an element, interpreting the attributes its kind understands.
    ///
    /// Bad values are lookup misses: they warn once and fall back to the
    /// default.
    #[must_use]
    pub fn new(kind: ElementKind, attrs: Vec<Attribute>) -> Self {
        let mut element = Self {
            kind,
            attrs: Vec::new(),
            length: Length::Auto,
            margin: Margin::default(),
            align: Align::Justify,
            color: Color::TRANSPARENT,
            id: None,
            on_click: None,
            text: String::new(),
            font_size: None,
            image: (kind == ElementKind::Image).then(|| ImageAttrs {
                source: "missing".to_string(),
                align: ImageAlign::Center,
                width: None,
                height: None,
            }),
            parent: None,
            children: Vec::new(),
            rect: None,
        };
        for attr in &attrs {
            element.interpret(attr);
        }
        element.attrs = attrs;
        element
    }

    /// Shorthand for an element with no attributes.
    #[must_use]
    pub fn bare(kind: ElementKind) -> Self {
        Self::new(kind, Vec::new())
    }

    fn interpret(&mut self, attr: &Attribute) {
        let value = attr.value.as_str();
        match (attr.name.as_str(), self.kind) {
            ("length", _) => {
                self.length = value.parse().unwrap_or_else(|e| {
                    warn_once("dom", &format!("{e} on <{}>, using auto", self.kind));
                    Length::Auto
                });
            }
            ("margin", _) => {
                self.margin = value.parse().unwrap_or_else(|e| {
                    warn_once("dom", &format!("{e} on <{}>, using 0px", self.kind));
                    Margin::default()
                });
            }
            ("id", _) => self.id = Some(value.to_string()),
            ("onclick", _) => self.on_click = Some(value.to_string()),
            ("text", ElementKind::Text | ElementKind::Button) => self.text.push_str(value),
            ("size", ElementKind::Text | ElementKind::Button) => match value.trim().parse::<f32>() {
                Ok(size) if size.is_finite() && size > 0.0 => self.font_size = Some(size),
                _ => warn_once("dom", &format!("invalid size value '{value}' on <{}>", self.kind)),
            },
            ("color" | "colour", _) => {
                // Anything that is not a hex literal paints opaque white.
                self.color = Color::from_hex(value).unwrap_or(Color::WHITE);
            }
            ("align", ElementKind::Image) => {
                if let Some(image) = self.image.as_mut() {
                    image.align = value.parse().unwrap_or_else(|e| {
                        warn_once("dom", &format!("{e} on <image>, using center"));
                        ImageAlign::Center
                    });
                }
            }
            ("align", kind) if kind.is_distributing() => {
                self.align = Align::parse(value, kind.align_aliases()).unwrap_or_else(|e| {
                    warn_once("dom", &format!("{e} on <{kind}>, using justify"));
                    Align::Justify
                });
            }
            ("source", ElementKind::Image) => {
                if let Some(image) = self.image.as_mut() {
                    image.source = value.to_string();
                }
            }
            ("w" | "h", ElementKind::Image) => {
                let parsed = value.trim().parse::<f32>().ok().filter(|n| n.is_finite() && *n > 0.0);
                if parsed.is_none() {
                    warn_once("dom", &format!("invalid {} value '{value}' on <image>", attr.name));
                }
                if let Some(image) = self.image.as_mut() {
                    if attr.name == "w" {
                        image.width = parsed;
                    } else {
                        image.height = parsed;
                    }
                }
            }
            // Everything else stays in `attrs` for callbacks to read.
            _ => {}
        }
    }

    /// Look up a raw attribute value (the last one wins on repeats).
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .rev()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_table() {
        assert_eq!("horizontal".parse::<ElementKind>(), Ok(ElementKind::Horizontal));
        assert_eq!("space".parse::<ElementKind>(), Ok(ElementKind::Space));
        assert!("div".parse::<ElementKind>().is_err());
        assert_eq!(ElementKind::Crosswise.to_string(), "crosswise");
        assert!(ElementKind::Button.is_container());
        assert!(ElementKind::Text.is_void());
        assert!(ElementKind::Image.is_void());
    }

    #[test]
    fn test_interpreted_attributes() {
        let e = Element::new(
            ElementKind::Horizontal,
            vec![
                Attribute::new("length", "30%"),
                Attribute::new("align", "right"),
                Attribute::new("color", "#10203040"),
                Attribute::new("id", "row"),
                Attribute::new("data-level", "3"),
            ],
        );
        assert_eq!(e.length, Length::Percent(30.0));
        assert_eq!(e.align, Align::After);
        assert_eq!(e.color, Color::rgba(0x10, 0x20, 0x30, 0x40));
        assert_eq!(e.id.as_deref(), Some("row"));
        assert_eq!(e.attr("data-level"), Some("3"));
        assert_eq!(e.attrs.len(), 5);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let e = Element::new(
            ElementKind::Vertical,
            vec![
                Attribute::new("length", "huge"),
                Attribute::new("align", "left"),
                Attribute::new("colour", "red"),
            ],
        );
        assert_eq!(e.length, Length::Auto);
        assert_eq!(e.align, Align::Justify);
        assert_eq!(e.color, Color::WHITE);
    }

    #[test]
    fn test_image_attributes() {
        let e = Element::new(
            ElementKind::Image,
            vec![
                Attribute::new("source", "robot.png"),
                Attribute::new("align", "left"),
                Attribute::new("w", "64"),
                Attribute::new("h", "32"),
            ],
        );
        let image = e.image.expect("image attrs");
        assert_eq!(image.source, "robot.png");
        assert_eq!(image.align, ImageAlign::Left);
        assert_eq!(image.width, Some(64.0));
        assert_eq!(image.height, Some(32.0));
    }
}
