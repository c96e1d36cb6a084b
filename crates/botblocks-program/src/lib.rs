//! The player's program.
//!
//! - [`Program`] - a tree of [`CodeBlock`]s edited through a [`Cursor`]
//! - [`BlockStyle`] - on-screen arrangement and drag-and-drop point queries
//! - [`Execution`] / [`Runner`] - lazy unrolling and wall-clock pacing
//! - [`Ticks`] - the per-frame clock the host advances

mod arrange;
mod block;
mod cursor;
mod error;
mod execution;
mod program;
mod ticks;

pub use arrange::BlockStyle;
pub use block::{BlockKind, BlockTemplate, CodeBlock, Move};
pub use cursor::Cursor;
pub use error::{AddressError, TemplateError};
pub use execution::{Execution, Runner, Step};
pub use program::Program;
pub use ticks::Ticks;
