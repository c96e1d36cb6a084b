//! Cursor addressing.

use std::fmt;

use crate::error::AddressError;

/// An insertion point in the program tree.
///
/// Every index but the last descends into a container; the last is the
/// offset within that container's body (or the top-level list).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(Vec<usize>);

impl Cursor {
    /// Wrap a path.
    ///
    /// # Errors
    ///
    /// [`AddressError::EmptyPath`] for `[]`.
    pub fn new(path: Vec<usize>) -> Result<Self, AddressError> {
        if path.is_empty() {
            return Err(AddressError::EmptyPath);
        }
        Ok(Self(path))
    }

    /// The full path.
    #[must_use]
    pub fn path(&self) -> &[usize] {
        &self.0
    }

    /// The container indices (all but the last).
    #[must_use]
    pub fn scope(&self) -> &[usize] {
        &self.0[..self.0.len() - 1]
    }

    /// The insertion offset within the scope.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    pub(crate) fn top_level(offset: usize) -> Self {
        Self(vec![offset])
    }

    pub(crate) fn path_mut(&mut self) -> &mut Vec<usize> {
        &mut self.0
    }

    pub(crate) fn advance(&mut self) {
        if let Some(last) = self.0.last_mut() {
            *last += 1;
        }
    }
}

impl Default for Cursor {
    /// The start of the top-level list.
    fn default() -> Self {
        Self(vec![0])
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl TryFrom<&[usize]> for Cursor {
    type Error = AddressError;

    fn try_from(path: &[usize]) -> Result<Self, Self::Error> {
        Self::new(path.to_vec())
    }
}
