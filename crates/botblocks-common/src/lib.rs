//! Common utilities for botblocks.
//!
//! This crate provides shared infrastructure used by every other crate:
//! - **Geometry** - rectangles, points and sizes in screen pixels
//! - **Colour** - RGBA colours parsed from `#RRGGBB[AA]` attribute values
//! - **Collaborators** - the text measurement and image provider seams the
//!   layout core calls but never implements
//! - **Warning System** - coloured, deduplicated terminal diagnostics

pub mod color;
pub mod geometry;
pub mod image;
pub mod text;
pub mod warning;

pub use color::Color;
pub use geometry::{Point, Rect, Size};
pub use image::{ImageProvider, NoImages};
pub use text::{ApproximateTextMeasure, Font, TextMeasure};
