//! Program errors.

use thiserror::Error;

/// A path that does not resolve in the program tree.
///
/// These indicate bookkeeping bugs in the caller; the tree is left
/// unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Paths need at least the insertion offset.
    #[error("empty block path")]
    EmptyPath,
    /// An index past the end of its list.
    #[error("index {index} out of range at depth {depth} (list holds {len})")]
    OutOfRange {
        /// Position of the bad index within the path.
        depth: usize,
        /// The bad index.
        index: usize,
        /// Length of the list it indexed.
        len: usize,
    },
    /// A path segment that descends through a leaf.
    #[error("block at depth {depth}, index {index} is not a container")]
    NotAContainer {
        /// Position of the segment within the path.
        depth: usize,
        /// The index of the leaf.
        index: usize,
    },
}

/// A palette entry that cannot produce a block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Leaf templates must name a move.
    #[error("unknown move '{0}'")]
    UnknownMove(String),
}
