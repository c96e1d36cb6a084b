//! Tree construction.
//!
//! Pulls tokens one at a time and maintains a stack of open elements.
//! Nesting depth is bounded by memory, not by the call stack.

use botblocks_dom::{Document, Element, ElementKind, NodeId};

use crate::error::{ParseError, ParseErrorKind, Position};
use crate::tokenizer::{Token, Tokenizer};

/// Where the builder is relative to the root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No element seen yet.
    BeforeRoot,
    /// Inside the root (the stack is non-empty).
    InRoot,
    /// The root has closed; only whitespace, comments and EOF may follow.
    AfterRoot,
}

/// Builds a [`Document`] from markup source.
pub struct MarkupParser<'a> {
    tokenizer: Tokenizer<'a>,
    document: Option<Document>,
    stack_of_open_elements: Vec<NodeId>,
    phase: Phase,
}

/// Parse `source` into a document.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered.
pub fn parse(source: &str) -> Result<Document, ParseError> {
    MarkupParser::new(source).run()
}

impl<'a> MarkupParser<'a> {
    /// Create a parser over `source`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            tokenizer: Tokenizer::new(source),
            document: None,
            stack_of_open_elements: Vec::new(),
            phase: Phase::BeforeRoot,
        }
    }

    /// Consume the input and return the finished document.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered.
    pub fn run(mut self) -> Result<Document, ParseError> {
        loop {
            match self.tokenizer.next_token()? {
                Token::StartTag {
                    name,
                    self_closing,
                    attributes,
                    position,
                } => {
                    let kind = self.kind_of(&name, position)?;
                    if self.phase == Phase::AfterRoot {
                        return Err(self.error(ParseErrorKind::TrailingContent(name), position));
                    }
                    self.insert(Element::new(kind, attributes), !self_closing);
                }
                Token::EndTag { name, position } => self.close(&name, position)?,
                Token::Text { data, position } => {
                    let Some(&current) = self.stack_of_open_elements.last() else {
                        return Err(self.error(ParseErrorKind::TextOutsideElement(data), position));
                    };
                    // Trimmed runs are appended as they are, with no separator.
                    if let Some(element) = self.document.as_mut().and_then(|d| d.get_mut(current)) {
                        element.text.push_str(&data);
                    }
                }
                Token::EndOfFile { position } => {
                    if let Some(&open) = self.stack_of_open_elements.last() {
                        let name = self.name_of(open);
                        return Err(self.error(ParseErrorKind::UnclosedElement(name), position));
                    }
                    return self
                        .document
                        .ok_or_else(|| ParseError::new(ParseErrorKind::NoRootElement, position, self.tokenizer.input()));
                }
            }
        }
    }

    fn kind_of(&self, name: &str, position: Position) -> Result<ElementKind, ParseError> {
        name.parse::<ElementKind>()
            .map_err(|_| self.error(ParseErrorKind::UnknownTag(name.to_string()), position))
    }

    /// Insert an element under the current node, or as the root.
    ///
    /// Containers are pushed unless self-closed, in which case they stay
    /// empty. Void kinds are never pushed.
    fn insert(&mut self, element: Element, open: bool) {
        let is_container = element.kind.is_container();
        let id = match (self.document.as_mut(), self.stack_of_open_elements.last()) {
            (Some(document), Some(&parent)) => document.append_child(parent, element),
            _ => {
                self.document = Some(Document::new(element));
                NodeId::ROOT
            }
        };
        if is_container && open {
            self.stack_of_open_elements.push(id);
            self.phase = Phase::InRoot;
        } else if self.stack_of_open_elements.is_empty() {
            self.phase = Phase::AfterRoot;
        }
    }

    fn close(&mut self, name: &str, position: Position) -> Result<(), ParseError> {
        let Some(&open) = self.stack_of_open_elements.last() else {
            return Err(self.error(ParseErrorKind::UnexpectedEndTag(name.to_string()), position));
        };
        let kind = self.kind_of(name, position)?;
        if kind.is_void() {
            return Err(self.error(ParseErrorKind::VoidEndTag(name.to_string()), position));
        }
        let open_name = self.name_of(open);
        if open_name != name {
            return Err(self.error(
                ParseErrorKind::MismatchedEndTag {
                    open: open_name,
                    close: name.to_string(),
                },
                position,
            ));
        }
        let _ = self.stack_of_open_elements.pop();
        if self.stack_of_open_elements.is_empty() {
            self.phase = Phase::AfterRoot;
        }
        Ok(())
    }

    fn name_of(&self, id: NodeId) -> String {
        self.document
            .as_ref()
            .and_then(|d| d.get(id))
            .map(|e| e.kind.to_string())
            .unwrap_or_default()
    }

    fn error(&self, kind: ParseErrorKind, position: Position) -> ParseError {
        ParseError::new(kind, position, self.tokenizer.input())
    }
}
