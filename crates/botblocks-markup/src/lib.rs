//! Markup tokenizer and tree builder for botblocks pages.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** - a character-level state machine producing start tag,
//!   end tag, text and end-of-file tokens with source positions
//!   - quoted, unquoted and bare attributes
//!   - the predefined entities and numeric character references
//!   - comments, processing instructions and declarations (skipped)
//!
//! - **Tree builder** - a stack of open elements that turns the token stream
//!   into exactly one [`botblocks_dom::Document`], or a [`ParseError`] that
//!   names the line, column and source line at fault.
//!
//! The tag vocabulary is closed: see [`botblocks_dom::ElementKind`].

pub mod error;
pub mod parser;
pub mod tokenizer;

pub use error::{ParseError, ParseErrorKind, Position};
pub use parser::{MarkupParser, parse};
pub use tokenizer::{Token, Tokenizer};
