//! The program tree and its editing operations.

use botblocks_common::Point;

use crate::arrange::BlockStyle;
use crate::block::CodeBlock;
use crate::cursor::Cursor;
use crate::error::AddressError;

/// The player's program: a list of top-level blocks plus the cursor.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub(crate) blocks: Vec<CodeBlock>,
    pub(crate) cursor: Cursor,
    pub(crate) style: BlockStyle,
    /// Top-left of the top-level list at the last arrange.
    pub(crate) origin: Point,
}

impl Program {
    /// An empty program with the cursor at `[0]`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A program holding `blocks`, cursor at the end of the top-level list.
    #[must_use]
    pub fn from_blocks(blocks: Vec<CodeBlock>) -> Self {
        let cursor = Cursor::top_level(blocks.len());
        Self {
            blocks,
            cursor,
            ..Self::default()
        }
    }

    /// Use `style` for subsequent arranges.
    #[must_use]
    pub fn with_style(mut self, style: BlockStyle) -> Self {
        self.style = style;
        self
    }

    /// Top-level blocks.
    #[must_use]
    pub fn blocks(&self) -> &[CodeBlock] {
        &self.blocks
    }

    /// The current insertion point.
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// The block style used by arrange.
    #[must_use]
    pub const fn style(&self) -> &BlockStyle {
        &self.style
    }

    /// Whether the program has no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Every block, counting containers once plus their bodies.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.iter().map(CodeBlock::count).sum()
    }

    /// Clear the program for a level start or restart.
    pub fn reset(&mut self) {
        self.blocks.clear();
        self.cursor = Cursor::default();
    }

    /// The list addressed by `scope` (container indices from the top).
    ///
    /// # Errors
    ///
    /// When an index is out of range or names a leaf.
    pub fn list(&self, scope: &[usize]) -> Result<&[CodeBlock], AddressError> {
        let mut list = self.blocks.as_slice();
        for (depth, &index) in scope.iter().enumerate() {
            let block = list.get(index).ok_or(AddressError::OutOfRange {
                depth,
                index,
                len: list.len(),
            })?;
            list = block
                .children()
                .ok_or(AddressError::NotAContainer { depth, index })?;
        }
        Ok(list)
    }

    fn list_mut(&mut self, scope: &[usize]) -> Result<&mut Vec<CodeBlock>, AddressError> {
        let mut list = &mut self.blocks;
        for (depth, &index) in scope.iter().enumerate() {
            let len = list.len();
            let block = list
                .get_mut(index)
                .ok_or(AddressError::OutOfRange { depth, index, len })?;
            list = block
                .children_mut()
                .ok_or(AddressError::NotAContainer { depth, index })?;
        }
        Ok(list)
    }

    /// The block at `path`.
    ///
    /// # Errors
    ///
    /// When `path` is empty or does not resolve to a block.
    pub fn get(&self, path: &[usize]) -> Result<&CodeBlock, AddressError> {
        let (&index, scope) = path.split_last().ok_or(AddressError::EmptyPath)?;
        let list = self.list(scope)?;
        list.get(index).ok_or(AddressError::OutOfRange {
            depth: scope.len(),
            index,
            len: list.len(),
        })
    }

    /// Move the cursor, checking that it names a real gap.
    ///
    /// # Errors
    ///
    /// When the scope does not resolve or the offset is past the end.
    pub fn set_cursor(&mut self, cursor: Cursor) -> Result<(), AddressError> {
        let list = self.list(cursor.scope())?;
        if cursor.offset() > list.len() {
            return Err(AddressError::OutOfRange {
                depth: cursor.scope().len(),
                index: cursor.offset(),
                len: list.len(),
            });
        }
        self.cursor = cursor;
        Ok(())
    }

    /// Insert `block` at the cursor and advance the cursor past it.
    ///
    /// # Errors
    ///
    /// When the cursor no longer resolves. The block is dropped.
    pub fn place(&mut self, block: CodeBlock) -> Result<(), AddressError> {
        let offset = self.cursor.offset();
        let depth = self.cursor.scope().len();
        let scope = self.cursor.scope().to_vec();
        let list = self.list_mut(&scope)?;
        if offset > list.len() {
            return Err(AddressError::OutOfRange {
                depth,
                index: offset,
                len: list.len(),
            });
        }
        list.insert(offset, block);
        self.cursor.advance();
        Ok(())
    }

    /// Remove and return the block at `path`.
    ///
    /// The cursor keeps pointing at the same logical gap: an earlier sibling
    /// on the cursor's path shifts it back by one, and a cursor inside the
    /// removed container falls back to the slot the container occupied.
    ///
    /// # Errors
    ///
    /// When `path` is empty or does not resolve to a block.
    pub fn remove(&mut self, path: &[usize]) -> Result<CodeBlock, AddressError> {
        let (&index, scope) = path.split_last().ok_or(AddressError::EmptyPath)?;
        let list = self.list_mut(scope)?;
        if index >= list.len() {
            return Err(AddressError::OutOfRange {
                depth: scope.len(),
                index,
                len: list.len(),
            });
        }
        let block = list.remove(index);

        let depth = scope.len();
        let cursor = self.cursor.path_mut();
        if cursor.len() > depth && cursor[..depth] == *scope {
            let same_scope = cursor.len() == depth + 1;
            if cursor[depth] > index {
                cursor[depth] -= 1;
            } else if cursor[depth] == index && !same_scope {
                cursor.truncate(depth + 1);
            }
        }
        Ok(block)
    }
}
