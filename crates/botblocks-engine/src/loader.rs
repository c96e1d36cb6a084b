//! Page and level loading.
//!
//! A page is a markup file parsed into a [`Document`], with the text of
//! every Text and Button run through the string table. A level is a JSON
//! file with the block palette and the tile map:
//!
//! ```json
//! {"blocks": [{"name": "forward"}, {"name": "repeat", "color": 2, "repeat": 3}],
//!  "map": [[0, 1, 1], [0, 0, 2]]}
//! ```

use std::fs;
use std::path::Path;

use botblocks_common::warning::clear_warnings;
use botblocks_dom::{Document, ElementKind};
use botblocks_markup::ParseError;
use botblocks_program::{BlockTemplate, TemplateError};
use serde::{Deserialize, Serialize};

use crate::strings::StringTable;

/// Error type for page and level loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The markup is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The level file is not valid JSON for this shape.
    #[error("invalid level: {0}")]
    Json(#[from] serde_json::Error),
    /// A palette entry names no move.
    #[error("invalid level: {0}")]
    Template(#[from] TemplateError),
    /// Map rows differ in length.
    #[error("invalid map, row {row} has {found} tiles instead of {expected}")]
    RaggedMap {
        /// Zero-based row index.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of this row.
        found: usize,
    },
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Load a page from a markup file.
///
/// Starts a fresh warning epoch, so lookup misses on the new page are
/// reported even if an earlier page had the same ones.
///
/// # Errors
///
/// I/O failures and [`ParseError`]s.
pub fn load_page(path: &Path, strings: &StringTable) -> Result<Document, LoadError> {
    let markup = read(path)?;
    clear_warnings();
    parse_page(&markup, strings)
}

/// Parse markup into a localised page.
///
/// # Errors
///
/// Any [`ParseError`].
pub fn parse_page(markup: &str, strings: &StringTable) -> Result<Document, LoadError> {
    let mut document = botblocks_markup::parse(markup)?;
    localize(&mut document, strings);
    Ok(document)
}

/// Replace every Text and Button payload that is a string-table key with
/// its display string. Anything else is literal text and stays.
pub fn localize(document: &mut Document, strings: &StringTable) {
    let ids: Vec<_> = document.descendants(document.root()).collect();
    for id in ids {
        let Some(element) = document.get_mut(id) else {
            continue;
        };
        if !matches!(element.kind, ElementKind::Text | ElementKind::Button) {
            continue;
        }
        if let Some(text) = strings.get(&element.text) {
            element.text = text.to_string();
        }
    }
}

/// One puzzle: the blocks the player may use and the tile map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Palette, in display order.
    pub blocks: Vec<BlockTemplate>,
    /// Tile indices, row by row. Rendering them is the host's job.
    #[serde(default)]
    pub map: Vec<Vec<u32>>,
}

impl Level {
    /// Parse and validate a level.
    ///
    /// # Errors
    ///
    /// Malformed JSON, a leaf template naming no move, or ragged map rows.
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        let level: Self = serde_json::from_str(text)?;
        level.validate()?;
        Ok(level)
    }

    /// Read a level file.
    ///
    /// # Errors
    ///
    /// I/O failures, plus everything [`Level::from_json`] rejects.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        Self::from_json(&read(path)?)
    }

    /// Check the palette and the map shape.
    ///
    /// # Errors
    ///
    /// See [`Level::from_json`].
    pub fn validate(&self) -> Result<(), LoadError> {
        for template in &self.blocks {
            let _ = template.instantiate()?;
        }
        let expected = self.width();
        if let Some((row, found)) = self
            .map
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(LoadError::RaggedMap {
                row,
                expected,
                found,
            });
        }
        Ok(())
    }

    /// Tiles per row (zero for an empty map).
    #[must_use]
    pub fn width(&self) -> usize {
        self.map.first().map_or(0, Vec::len)
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.map.len()
    }
}
