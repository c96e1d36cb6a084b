//! Painting: turn a laid-out document into drawing commands.
//!
//! The core never draws pixels itself. [`Painter`] produces a
//! [`DisplayList`], and a host-supplied [`RenderSurface`] executes it.

mod display_list;
mod painter;

pub use display_list::{DisplayCommand, DisplayList, RenderSurface};
pub use painter::{BUTTON_FILL, Painter, fit};
