//! Code blocks and the palette templates they are made from.

use std::num::NonZeroU32;
use std::str::FromStr;

use botblocks_common::Rect;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::TemplateError;

/// A robot move.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Move {
    /// One tile ahead.
    Forward,
    /// Quarter turn anticlockwise.
    Left,
    /// Quarter turn clockwise.
    Right,
}

/// What a block does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockKind {
    /// A single move.
    Leaf {
        /// The move performed.
        #[serde(rename = "move")]
        action: Move,
    },
    /// Runs its body `repeat` times.
    Repeat {
        /// Fixed at creation.
        repeat: NonZeroU32,
        /// Owned children, in order.
        #[serde(default)]
        body: Vec<CodeBlock>,
    },
}

/// A node of the program tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Leaf or container payload.
    #[serde(flatten)]
    pub kind: BlockKind,
    /// Palette colour index, for display only.
    #[serde(default)]
    pub skin: u32,
    /// Screen rectangle from the last arrange.
    #[serde(skip)]
    pub rect: Option<Rect>,
}

impl CodeBlock {
    /// A leaf block.
    #[must_use]
    pub const fn leaf(action: Move, skin: u32) -> Self {
        Self {
            kind: BlockKind::Leaf { action },
            skin,
            rect: None,
        }
    }

    /// An empty repeat container.
    #[must_use]
    pub const fn repeat(count: NonZeroU32, skin: u32) -> Self {
        Self {
            kind: BlockKind::Repeat {
                repeat: count,
                body: Vec::new(),
            },
            skin,
            rect: None,
        }
    }

    /// A repeat container holding `body`.
    #[must_use]
    pub fn repeat_with(count: NonZeroU32, skin: u32, body: Vec<Self>) -> Self {
        Self {
            kind: BlockKind::Repeat {
                repeat: count,
                body,
            },
            skin,
            rect: None,
        }
    }

    /// Whether this block holds children.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self.kind, BlockKind::Repeat { .. })
    }

    /// The body of a container.
    #[must_use]
    pub fn children(&self) -> Option<&[Self]> {
        match &self.kind {
            BlockKind::Repeat { body, .. } => Some(body),
            BlockKind::Leaf { .. } => None,
        }
    }

    /// The body of a container, mutably.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        match &mut self.kind {
            BlockKind::Repeat { body, .. } => Some(body),
            BlockKind::Leaf { .. } => None,
        }
    }

    /// This block plus everything below it.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self
            .children()
            .map_or(0, |body| body.iter().map(Self::count).sum())
    }

    /// Text shown on the block.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.kind {
            BlockKind::Leaf { action } => action.to_string(),
            BlockKind::Repeat { repeat, .. } => format!("repeat {repeat}"),
        }
    }
}

/// A palette entry, as found in level data.
///
/// ```json
/// {"name": "repeat", "color": 2, "repeat": 3}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTemplate {
    /// Move name for leaves; anything for containers.
    pub name: String,
    /// Palette colour index.
    #[serde(default)]
    pub color: u32,
    /// Present for container templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<NonZeroU32>,
}

impl BlockTemplate {
    /// Whether instances of this template hold children.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        self.repeat.is_some()
    }

    /// Make a fresh block from this template.
    ///
    /// # Errors
    ///
    /// Leaf templates whose name is not a [`Move`].
    pub fn instantiate(&self) -> Result<CodeBlock, TemplateError> {
        if let Some(count) = self.repeat {
            return Ok(CodeBlock::repeat(count, self.color));
        }
        Move::from_str(&self.name)
            .map(|action| CodeBlock::leaf(action, self.color))
            .map_err(|_| TemplateError::UnknownMove(self.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> NonZeroU32 {
        NonZeroU32::new(3).expect("non-zero")
    }

    #[test]
    fn test_count_includes_container_once() {
        let block = CodeBlock::repeat_with(
            three(),
            0,
            vec![CodeBlock::leaf(Move::Left, 0), CodeBlock::leaf(Move::Right, 0)],
        );
        assert_eq!(block.count(), 3);
        assert_eq!(block.label(), "repeat 3");
    }

    #[test]
    fn test_template_instantiation() {
        let leaf = BlockTemplate {
            name: "forward".into(),
            color: 1,
            repeat: None,
        };
        assert_eq!(leaf.instantiate(), Ok(CodeBlock::leaf(Move::Forward, 1)));

        let repeat = BlockTemplate {
            name: "repeat".into(),
            color: 2,
            repeat: Some(three()),
        };
        assert!(repeat.instantiate().is_ok_and(|b| b.is_container()));

        let bad = BlockTemplate {
            name: "jump".into(),
            color: 0,
            repeat: None,
        };
        assert_eq!(bad.instantiate(), Err(TemplateError::UnknownMove("jump".into())));
    }
}
