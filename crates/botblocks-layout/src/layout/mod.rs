//! Layout engine.
//!
//! Two passes over a [`Document`](botblocks_dom::Document):
//!
//! 1. **Measure** - a pure, bottom-up computation of each node's minimum size.
//! 2. **Place** - a top-down pass that applies margins, records drawables
//!    in paint order, stores each node's rectangle and partitions containers
//!    with the box model.
//!
//! # Module Structure
//!
//! - [`axis`] - row/column abstraction shared by both passes
//! - [`box_model`] - the distribution primitive and container minimums
//! - [`engine`] - the two passes

pub mod axis;
pub mod box_model;
pub mod engine;

pub use axis::Axis;
pub use box_model::{Sizing, Span, min_extent, partition};
pub use engine::{LayoutEngine, TEXT_PADDING};
