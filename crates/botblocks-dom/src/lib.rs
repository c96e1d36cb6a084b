//! Retained element tree for botblocks pages.
//!
//! A page is a [`Document`]: an arena of [`Element`]s addressed by
//! [`NodeId`], plus the identifier map, click registry, drawables list and
//! hover relation that layout, hit-testing and dispatch share.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships, providing O(1) access and traversal without borrow checker
//! issues. Element kinds form a closed enum; layout and painting dispatch on
//! it with a `match`.

mod document;
mod element;
pub mod values;

pub use document::{Descendants, Document, NodeId};
pub use element::{Attribute, Element, ElementKind, ImageAttrs};
pub use values::{Align, ImageAlign, InvalidValue, Length, Margin};
