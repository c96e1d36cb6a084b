//! Parse errors with source positions.

use std::fmt;

use thiserror::Error;

/// A 1-based line and column in the markup source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column in characters, starting at 1.
    pub column: usize,
}

impl Position {
    /// The first character of the input.
    pub const START: Self = Self { line: 1, column: 1 };
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// What went wrong while building the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A tag name outside the vocabulary.
    #[error("unrecognised element <{0}>")]
    UnknownTag(String),
    /// An end tag for a kind that never takes one.
    #[error("<{0}> cannot have a closing tag")]
    VoidEndTag(String),
    /// The end tag does not close the innermost open element.
    #[error("closing tag </{close}> does not match open <{open}>")]
    MismatchedEndTag {
        /// Innermost open element.
        open: String,
        /// The end tag that was found.
        close: String,
    },
    /// An end tag arrived with nothing open.
    #[error("unexpected closing tag </{0}>")]
    UnexpectedEndTag(String),
    /// Character data with no element to hold it.
    #[error("unexpected text '{0}' outside any element")]
    TextOutsideElement(String),
    /// A second top-level element after the root closed.
    #[error("unexpected <{0}> after the root element")]
    TrailingContent(String),
    /// Input ended without any element.
    #[error("unexpected end of input: no root element")]
    NoRootElement,
    /// Input ended with elements still open.
    #[error("unexpected end of input: <{0}> is never closed")]
    UnclosedElement(String),
    /// Input ended in the middle of a tag.
    #[error("unexpected end of input inside a tag")]
    EofInTag,
    /// Tag syntax the tokenizer cannot make sense of.
    #[error("malformed tag: {0}")]
    MalformedTag(&'static str),
}

/// A parse failure, located in the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {position}\n  | {source_line}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Where it went wrong.
    pub position: Position,
    /// The offending source line, for display.
    pub source_line: String,
}

impl ParseError {
    /// Build an error, copying the offending line out of `input`.
    #[must_use]
    pub fn new(kind: ParseErrorKind, position: Position, input: &str) -> Self {
        let source_line = input
            .lines()
            .nth(position.line.saturating_sub(1))
            .unwrap_or_default()
            .to_string();
        Self {
            kind,
            position,
            source_line,
        }
    }

    /// Line number of the error.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.position.line
    }

    /// Column number of the error.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.position.column
    }
}
