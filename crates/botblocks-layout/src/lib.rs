//! Layout, hit-testing and painting for botblocks documents.
//!
//! # Overview
//!
//! - [`layout`] - the box model primitive and the measure/place passes
//! - [`hit_test`] - point queries against the drawables list
//! - [`paint`] - display lists and the render-surface seam
//!
//! Enable the `layout-trace` feature to print every placement to stderr.

pub mod layout;
pub mod paint;

pub use hit_test::{hit_test, update_hover};
pub use layout::{Axis, LayoutEngine, Sizing, Span, TEXT_PADDING, min_extent, partition};
pub use paint::{BUTTON_FILL, DisplayCommand, DisplayList, Painter, RenderSurface, fit};
