//! Character-level tokenizer.
//!
//! A small state machine in the shape of the HTML tokenizer, cut down to the
//! subset botblocks markup uses. Tokens are produced on demand so the tree
//! builder can stop at the first error without scanning the rest of the
//! input.

use std::collections::VecDeque;

use botblocks_common::warning::warn_once;
use botblocks_dom::Attribute;

use crate::error::{ParseError, ParseErrorKind, Position};

/// A token handed to the tree builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<name attr="value" ...>` or `<name ... />`.
    StartTag {
        /// Lowercased tag name.
        name: String,
        /// Whether the tag ended with `/>`.
        self_closing: bool,
        /// Attributes in source order, values decoded.
        attributes: Vec<Attribute>,
        /// Position of the `<`.
        position: Position,
    },
    /// `</name>`.
    EndTag {
        /// Lowercased tag name.
        name: String,
        /// Position of the `<`.
        position: Position,
    },
    /// A run of character data, trimmed, never empty.
    Text {
        /// Decoded text.
        data: String,
        /// Position of the first character of the run.
        position: Position,
    },
    /// End of input.
    EndOfFile {
        /// Position just past the last character.
        position: Position,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenizerState {
    Data,
    TagOpen,
    EndTagOpen,
    TagName,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueDoubleQuoted,
    AttributeValueSingleQuoted,
    AttributeValueUnquoted,
    AfterAttributeValueQuoted,
    SelfClosingStartTag,
    Comment,
    BogusComment,
}

/// The tag currently being built.
#[derive(Debug, Default)]
struct TagBuilder {
    name: String,
    is_end: bool,
    self_closing: bool,
    attributes: Vec<Attribute>,
    attribute_name: Option<String>,
    attribute_value: String,
    position: Option<Position>,
}

impl TagBuilder {
    fn start(is_end: bool, position: Position) -> Self {
        Self {
            is_end,
            position: Some(position),
            ..Self::default()
        }
    }

    fn finish_attribute(&mut self) {
        if let Some(name) = self.attribute_name.take() {
            let value = std::mem::take(&mut self.attribute_value);
            self.attributes.push(Attribute::new(name, value));
        }
    }
}

/// Pull-based tokenizer over a markup string.
pub struct Tokenizer<'a> {
    input: &'a str,
    current_pos: usize,
    /// Position of the next unconsumed character.
    cursor: Position,
    /// Position of `current_input_character`.
    current_position: Position,
    current_input_character: Option<char>,
    state: TokenizerState,
    reconsume: bool,
    tag: TagBuilder,
    text: String,
    text_start: Option<Position>,
    pending: VecDeque<Token>,
    at_eof: bool,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer positioned at the start of `input`.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            current_pos: 0,
            cursor: Position::START,
            current_position: Position::START,
            current_input_character: None,
            state: TokenizerState::Data,
            reconsume: false,
            tag: TagBuilder::default(),
            text: String::new(),
            text_start: None,
            pending: VecDeque::new(),
            at_eof: false,
        }
    }

    /// The source being tokenized.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// Produce the next token.
    ///
    /// After [`Token::EndOfFile`] every further call returns another
    /// end-of-file token.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed tag syntax or input that ends
    /// inside a tag.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            if self.at_eof {
                return Ok(Token::EndOfFile {
                    position: self.cursor,
                });
            }
            if self.reconsume {
                self.reconsume = false;
            } else {
                self.current_position = self.cursor;
                self.current_input_character = self.consume();
            }
            self.step()?;
        }
    }

    /// Tokenize the whole input.
    ///
    /// # Errors
    ///
    /// Stops at the first tokenizer error.
    pub fn into_tokens(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = matches!(token, Token::EndOfFile { .. });
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    // -------------------------------------------------------------------------
    // State machine
    // -------------------------------------------------------------------------

    #[allow(clippy::too_many_lines)]
    fn step(&mut self) -> Result<(), ParseError> {
        let c = self.current_input_character;
        match self.state {
            TokenizerState::Data => match c {
                Some('<') => {
                    self.flush_text();
                    self.tag = TagBuilder::start(false, self.current_position);
                    self.switch_to(TokenizerState::TagOpen);
                }
                Some('&') => {
                    self.mark_text_start();
                    let decoded = self.consume_character_reference();
                    self.text.push_str(&decoded);
                }
                Some(c) => {
                    if !c.is_whitespace() {
                        self.mark_text_start();
                    }
                    self.text.push(c);
                }
                None => {
                    self.flush_text();
                    self.pending.push_back(Token::EndOfFile {
                        position: self.cursor,
                    });
                    self.at_eof = true;
                }
            },
            TokenizerState::TagOpen => match c {
                Some('/') => {
                    self.tag.is_end = true;
                    self.switch_to(TokenizerState::EndTagOpen);
                }
                Some('!') => {
                    if self.next_few_characters_are("--") {
                        let _ = self.consume();
                        let _ = self.consume();
                        self.switch_to(TokenizerState::Comment);
                    } else {
                        self.switch_to(TokenizerState::BogusComment);
                    }
                }
                Some('?') => self.switch_to(TokenizerState::BogusComment),
                Some(c) if c.is_ascii_alphabetic() => self.reconsume_in(TokenizerState::TagName),
                Some(_) => return Err(self.error(ParseErrorKind::MalformedTag("expected a tag name after '<'"))),
                None => return Err(self.error(ParseErrorKind::EofInTag)),
            },
            TokenizerState::EndTagOpen => match c {
                Some(c) if c.is_ascii_alphabetic() => self.reconsume_in(TokenizerState::TagName),
                Some(_) => return Err(self.error(ParseErrorKind::MalformedTag("missing end tag name"))),
                None => return Err(self.error(ParseErrorKind::EofInTag)),
            },
            TokenizerState::TagName => match c {
                Some(c) if c.is_whitespace() => self.switch_to(TokenizerState::BeforeAttributeName),
                Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
                Some('>') => self.emit_tag(),
                Some(c) => self.tag.name.push(c.to_ascii_lowercase()),
                None => return Err(self.error(ParseErrorKind::EofInTag)),
            },
            TokenizerState::BeforeAttributeName => match c {
                Some(c) if c.is_whitespace() => {}
                Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
                Some('>') => self.emit_tag(),
                Some('=' | '"' | '\'' | '<') => {
                    return Err(self.error(ParseErrorKind::MalformedTag("unexpected character before attribute name")));
                }
                Some(_) => {
                    self.tag.attribute_name = Some(String::new());
                    self.reconsume_in(TokenizerState::AttributeName);
                }
                None => return Err(self.error(ParseErrorKind::EofInTag)),
            },
            TokenizerState::AttributeName => match c {
                Some(c) if c.is_whitespace() => self.switch_to(TokenizerState::AfterAttributeName),
                Some('/' | '>') => self.reconsume_in(TokenizerState::AfterAttributeName),
                Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
                Some('"' | '\'' | '<') => {
                    return Err(self.error(ParseErrorKind::MalformedTag("unexpected character in attribute name")));
                }
                Some(c) => {
                    if let Some(name) = self.tag.attribute_name.as_mut() {
                        name.push(c.to_ascii_lowercase());
                    }
                }
                None => return Err(self.error(ParseErrorKind::EofInTag)),
            },
            TokenizerState::AfterAttributeName => match c {
                Some(c) if c.is_whitespace() => {}
                Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
                Some('/') => {
                    self.tag.finish_attribute();
                    self.switch_to(TokenizerState::SelfClosingStartTag);
                }
                Some('>') => {
                    self.tag.finish_attribute();
                    self.emit_tag();
                }
                Some(_) => {
                    // A bare attribute followed by the next name.
                    self.tag.finish_attribute();
                    self.tag.attribute_name = Some(String::new());
                    self.reconsume_in(TokenizerState::AttributeName);
                }
                None => return Err(self.error(ParseErrorKind::EofInTag)),
            },
            TokenizerState::BeforeAttributeValue => match c {
                Some(c) if c.is_whitespace() => {}
                Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
                Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
                Some('>') => return Err(self.error(ParseErrorKind::MalformedTag("missing attribute value"))),
                Some(_) => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
                None => return Err(self.error(ParseErrorKind::EofInTag)),
            },
            TokenizerState::AttributeValueDoubleQuoted | TokenizerState::AttributeValueSingleQuoted => {
                let quote = if self.state == TokenizerState::AttributeValueDoubleQuoted {
                    '"'
                } else {
                    '\''
                };
                match c {
                    Some(c) if c == quote => {
                        self.tag.finish_attribute();
                        self.switch_to(TokenizerState::AfterAttributeValueQuoted);
                    }
                    Some('&') => {
                        let decoded = self.consume_character_reference();
                        self.tag.attribute_value.push_str(&decoded);
                    }
                    Some(c) => self.tag.attribute_value.push(c),
                    None => return Err(self.error(ParseErrorKind::EofInTag)),
                }
            }
            TokenizerState::AttributeValueUnquoted => match c {
                Some(c) if c.is_whitespace() => {
                    self.tag.finish_attribute();
                    self.switch_to(TokenizerState::BeforeAttributeName);
                }
                Some('>') => {
                    self.tag.finish_attribute();
                    self.emit_tag();
                }
                Some('&') => {
                    let decoded = self.consume_character_reference();
                    self.tag.attribute_value.push_str(&decoded);
                }
                Some('"' | '\'' | '<' | '=' | '`') => {
                    return Err(self.error(ParseErrorKind::MalformedTag("unexpected character in unquoted attribute value")));
                }
                Some(c) => self.tag.attribute_value.push(c),
                None => return Err(self.error(ParseErrorKind::EofInTag)),
            },
            TokenizerState::AfterAttributeValueQuoted => match c {
                Some(c) if c.is_whitespace() => self.switch_to(TokenizerState::BeforeAttributeName),
                Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
                Some('>') => self.emit_tag(),
                Some(_) => {
                    return Err(self.error(ParseErrorKind::MalformedTag("missing whitespace between attributes")));
                }
                None => return Err(self.error(ParseErrorKind::EofInTag)),
            },
            TokenizerState::SelfClosingStartTag => match c {
                Some('>') => {
                    self.tag.self_closing = true;
                    self.emit_tag();
                }
                Some(_) => return Err(self.error(ParseErrorKind::MalformedTag("unexpected '/' in tag"))),
                None => return Err(self.error(ParseErrorKind::EofInTag)),
            },
            TokenizerState::Comment => match c {
                Some('-') if self.next_few_characters_are("->") => {
                    let _ = self.consume();
                    let _ = self.consume();
                    self.switch_to(TokenizerState::Data);
                }
                Some(_) => {}
                None => return Err(self.error(ParseErrorKind::EofInTag)),
            },
            TokenizerState::BogusComment => match c {
                Some('>') => self.switch_to(TokenizerState::Data),
                Some(_) => {}
                None => return Err(self.error(ParseErrorKind::EofInTag)),
            },
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        if c == '\n' {
            self.cursor.line += 1;
            self.cursor.column = 1;
        } else {
            self.cursor.column += 1;
        }
        Some(c)
    }

    fn next_few_characters_are(&self, target: &str) -> bool {
        self.input[self.current_pos..].starts_with(target)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.current_position, self.input)
    }

    fn mark_text_start(&mut self) {
        if self.text_start.is_none() {
            self.text_start = Some(self.current_position);
        }
    }

    /// Emit the pending character data, trimmed. Whitespace-only runs vanish.
    fn flush_text(&mut self) {
        let raw = std::mem::take(&mut self.text);
        let Some(start) = self.text_start.take() else {
            return;
        };
        let data = raw.trim();
        if !data.is_empty() {
            self.pending.push_back(Token::Text {
                data: data.to_string(),
                position: start,
            });
        }
    }

    fn emit_tag(&mut self) {
        let tag = std::mem::take(&mut self.tag);
        let position = tag.position.unwrap_or(self.current_position);
        let token = if tag.is_end {
            Token::EndTag {
                name: tag.name,
                position,
            }
        } else {
            Token::StartTag {
                name: tag.name,
                self_closing: tag.self_closing,
                attributes: tag.attributes,
                position,
            }
        };
        self.pending.push_back(token);
        self.switch_to(TokenizerState::Data);
    }

    /// Called with the `&` just consumed. Consumes a complete reference and
    /// returns its expansion, or returns a literal `&` and consumes nothing.
    fn consume_character_reference(&mut self) -> String {
        let rest = &self.input[self.current_pos..];
        let Some(end) = rest
            .char_indices()
            .take(12)
            .find(|&(_, c)| c == ';' || !(c.is_ascii_alphanumeric() || c == '#'))
            .filter(|&(_, c)| c == ';')
            .map(|(i, _)| i)
        else {
            return "&".to_string();
        };
        let name = &rest[..end];
        let decoded = match name {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => name.strip_prefix('#').and_then(|digits| {
                let code = match digits.strip_prefix(['x', 'X']) {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => digits.parse::<u32>().ok(),
                };
                code.and_then(char::from_u32)
            }),
        };
        let Some(decoded) = decoded else {
            warn_once("markup", &format!("unknown character reference '&{name};' kept as text"));
            return "&".to_string();
        };
        for _ in 0..=name.chars().count() {
            let _ = self.consume();
        }
        decoded.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Tokenizer::new(input).into_tokens().expect("tokenize")
    }

    #[test]
    fn test_start_tag_with_attribute_forms() {
        let toks = tokens(r#"<Text a="1" b='two' c=3 d>"#);
        let Token::StartTag {
            name, attributes, self_closing, ..
        } = &toks[0]
        else {
            panic!("expected start tag, got {:?}", toks[0]);
        };
        assert_eq!(name, "text");
        assert!(!self_closing);
        let pairs: Vec<(&str, &str)> = attributes
            .iter()
            .map(|a| (a.name.as_str(), a.value.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "two"), ("c", "3"), ("d", "")]);
    }

    #[test]
    fn test_text_is_trimmed_and_positioned() {
        let toks = tokens("<text>\n   hello  </text>");
        assert_eq!(
            toks[1],
            Token::Text {
                data: "hello".to_string(),
                position: Position { line: 2, column: 4 },
            }
        );
    }

    #[test]
    fn test_entities() {
        let toks = tokens("<text t=\"&lt;&#65;&#x42;\">a &amp; b &bogus; c</text>");
        let Token::StartTag { attributes, .. } = &toks[0] else {
            panic!("expected start tag");
        };
        assert_eq!(attributes[0].value, "<AB");
        assert_eq!(
            toks[1],
            Token::Text {
                data: "a & b &bogus; c".to_string(),
                position: Position { line: 1, column: 27 },
            }
        );
    }

    #[test]
    fn test_comments_and_declarations_skipped() {
        let toks = tokens("<?xml version=\"1.0\"?><!DOCTYPE x><!-- <space> --><space/>");
        assert!(matches!(
            &toks[0],
            Token::StartTag { name, self_closing: true, .. } if name == "space"
        ));
        assert!(matches!(toks[1], Token::EndOfFile { .. }));
    }

    #[test]
    fn test_eof_inside_tag() {
        let err = Tokenizer::new("<text a=\"1").into_tokens().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EofInTag);
    }
}
